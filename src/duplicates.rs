//! Content-based duplicate detection.
//!
//! Files are hashed with BLAKE3, streamed in 64KB blocks. Only the immediate
//! files of a directory are considered. Because hashing a large directory is
//! slow, [`DuplicateScan`] runs the scan on a worker thread and hands the
//! result back over a channel.

use crate::error::{OrganizeError, OrganizeResult};
use crate::scan::immediate_files;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 hash of a file as lowercase hex.
///
/// # Example
/// ```no_run
/// use filedock::duplicates::hash_file;
/// use std::path::Path;
///
/// let hash = hash_file(Path::new("file.txt"))?;
/// assert_eq!(hash.len(), 64);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Groups of files sharing identical content.
///
/// Every group holds at least two paths, in discovery order. Groups iterate
/// in the order they were first detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateGroups {
    order: Vec<String>,
    groups: HashMap<String, Vec<PathBuf>>,
}

impl DuplicateGroups {
    /// Paths sharing the content hash `hash`, if any.
    pub fn get(&self, hash: &str) -> Option<&[PathBuf]> {
        self.groups.get(hash).map(Vec::as_slice)
    }

    /// Iterates `(hash, paths)` in detection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.order
            .iter()
            .map(|hash| (hash.as_str(), self.groups[hash].as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every path after the first of each group, i.e. the copies that can be
    /// removed while keeping one file per content.
    pub fn redundant_paths(&self) -> Vec<PathBuf> {
        self.iter()
            .flat_map(|(_, paths)| paths.iter().skip(1).cloned())
            .collect()
    }

    fn record(&mut self, hash: String, first: &Path, path: PathBuf) {
        match self.groups.get_mut(&hash) {
            Some(group) => group.push(path),
            None => {
                self.order.push(hash.clone());
                self.groups.insert(hash, vec![first.to_path_buf(), path]);
            }
        }
    }
}

/// Finds files with identical content among the immediate files of
/// `directory`.
///
/// Files that cannot be hashed are logged and left out of every group.
pub fn find_duplicates(directory: &Path) -> OrganizeResult<DuplicateGroups> {
    let files = immediate_files(directory)?;
    let mut first_seen: HashMap<String, PathBuf> = HashMap::new();
    let mut groups = DuplicateGroups::default();

    for path in files {
        let hash = match hash_file(&path) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not hash file, skipping");
                continue;
            }
        };

        match first_seen.get(&hash) {
            Some(first) => groups.record(hash, first, path),
            None => {
                first_seen.insert(hash, path);
            }
        }
    }

    info!(
        directory = %directory.display(),
        groups = groups.len(),
        "duplicate scan finished"
    );
    Ok(groups)
}

/// A duplicate scan running on a background thread.
///
/// Dropping the handle abandons the result: the worker still runs to
/// completion but its result is discarded. A worker that dies before
/// sending is reported as [`OrganizeError::WorkerLost`].
pub struct DuplicateScan {
    directory: PathBuf,
    receiver: Receiver<OrganizeResult<DuplicateGroups>>,
    finished: Option<OrganizeResult<DuplicateGroups>>,
}

impl DuplicateScan {
    /// Starts scanning `directory` on a new worker thread.
    pub fn spawn(directory: impl Into<PathBuf>) -> OrganizeResult<Self> {
        let directory = directory.into();
        let (sender, receiver) = mpsc::channel();
        let worker_dir = directory.clone();

        thread::Builder::new()
            .name("filedock-duplicates".to_string())
            .spawn(move || {
                let result = find_duplicates(&worker_dir);
                if sender.send(result).is_err() {
                    debug!(directory = %worker_dir.display(), "duplicate scan result abandoned");
                }
            })
            .map_err(OrganizeError::WorkerSpawnFailed)?;

        Ok(Self {
            directory,
            receiver,
            finished: None,
        })
    }

    /// The directory being scanned.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns true once the worker has delivered its result.
    pub fn is_finished(&mut self) -> bool {
        self.poll();
        self.finished.is_some()
    }

    /// Takes the result if the worker has finished, without blocking.
    pub fn try_result(&mut self) -> Option<OrganizeResult<DuplicateGroups>> {
        self.poll();
        self.finished.take()
    }

    /// Waits up to `timeout` for the result.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<OrganizeResult<DuplicateGroups>> {
        if self.finished.is_none() {
            match self.receiver.recv_timeout(timeout) {
                Ok(result) => self.finished = Some(result),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.finished = Some(Err(self.worker_lost())),
            }
        }
        self.finished.take()
    }

    /// Blocks until the worker delivers its result.
    pub fn wait(mut self) -> OrganizeResult<DuplicateGroups> {
        if let Some(result) = self.finished.take() {
            return result;
        }
        match self.receiver.recv() {
            Ok(result) => result,
            Err(_) => Err(self.worker_lost()),
        }
    }

    fn poll(&mut self) {
        if self.finished.is_some() {
            return;
        }
        match self.receiver.try_recv() {
            Ok(result) => self.finished = Some(result),
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => self.finished = Some(Err(self.worker_lost())),
        }
    }

    fn worker_lost(&self) -> OrganizeError {
        warn!(directory = %self.directory.display(), "duplicate scan worker exited without a result");
        OrganizeError::WorkerLost {
            path: self.directory.clone(),
        }
    }
}

/// Result of deleting a set of files.
#[derive(Debug, Default)]
pub struct DeleteReport {
    /// Files removed.
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Deletes every file in `paths`, continuing past failures.
///
/// Duplicate scan results are a snapshot; a path that has since vanished is
/// reported as a failure rather than aborting the rest.
pub fn delete_files(paths: &[PathBuf]) -> DeleteReport {
    let mut report = DeleteReport::default();
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "deleted duplicate");
                report.deleted.push(path.clone());
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not delete file");
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }
    report
}
