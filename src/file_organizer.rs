/// File organization system for moving files into category directories.
///
/// This module provides the collision-safe move primitive and the organize
/// operation built on top of it. Organizing is a best-effort batch: every
/// file yields its own outcome, a failure never aborts the remaining files,
/// and every successful move is recorded in the undo journal.
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_category::CategoryMap;
use crate::journal::{JournalStore, MoveRecord};
use crate::scan::immediate_files;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome of organizing a single file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was moved; the record is part of the journal.
    Moved(MoveRecord),
    /// The file was left in place.
    Failed { path: PathBuf, reason: String },
}

/// Result of an organize run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// One outcome per file, in processing order.
    pub outcomes: Vec<FileOutcome>,
    /// Whether the undo journal was written for this run.
    pub journal_saved: bool,
}

impl OrganizeReport {
    /// Number of files successfully moved.
    pub fn moved_count(&self) -> usize {
        self.records().count()
    }

    /// The successful moves, in performed order.
    pub fn records(&self) -> impl Iterator<Item = &MoveRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Moved(record) => Some(record),
            FileOutcome::Failed { .. } => None,
        })
    }

    /// Descriptions of every per-file failure.
    pub fn errors(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FileOutcome::Failed { path, reason } => {
                    Some(format!("Failed {}: {}", path.display(), reason))
                }
                FileOutcome::Moved(_) => None,
            })
            .collect()
    }
}

/// A move that organizing would perform, without performing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// The file that would be moved.
    pub source: PathBuf,
    /// The category subdirectory it would land in.
    pub category: String,
}

/// Moves a file to `destination` without ever overwriting an existing file.
///
/// The destination's parent directory is created (with any missing
/// ancestors). If `destination` is already taken, `_dup1`, `_dup2`, ... is
/// inserted between stem and extension until a free name is found.
///
/// Returns the path the file was actually moved to.
///
/// The existence check and the rename are not atomic; concurrent movers
/// targeting the same destination from other processes can race.
///
/// # Examples
///
/// ```no_run
/// use filedock::file_organizer::safe_move;
/// use std::path::Path;
///
/// let moved = safe_move(
///     Path::new("/downloads/report.pdf"),
///     Path::new("/downloads/DOCS/report.pdf"),
/// )?;
/// println!("moved to {}", moved.display());
/// # Ok::<(), filedock::OrganizeError>(())
/// ```
pub fn safe_move(source: &Path, destination: &Path) -> OrganizeResult<PathBuf> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let target = free_path(destination, "_dup");

    fs::rename(source, &target).map_err(|e| OrganizeError::FileMoveFailure {
        from: source.to_path_buf(),
        to: target.clone(),
        source: e,
    })?;

    Ok(target)
}

/// Returns `path` if nothing exists there, otherwise the first
/// `{stem}{tag}{N}{.ext}` sibling (N from 1) that does not exist.
pub(crate) fn free_path(path: &Path, tag: &str) -> PathBuf {
    if !exists_no_follow(path) {
        return path.to_path_buf();
    }

    // Built as OsString so non-UTF-8 names survive the rename unchanged.
    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();

    let mut n: u64 = 1;
    loop {
        let mut name = stem.to_os_string();
        name.push(tag);
        name.push(n.to_string());
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }

        let candidate = path.with_file_name(name);
        if !exists_no_follow(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Like `Path::exists`, but a dangling symlink still counts as taken.
fn exists_no_follow(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Organizes the files of a directory into category subdirectories.
pub struct FileOrganizer<'a> {
    categories: &'a CategoryMap,
    protected: Vec<PathBuf>,
}

impl<'a> FileOrganizer<'a> {
    /// Creates an organizer resolving categories through `categories`.
    pub fn new(categories: &'a CategoryMap) -> Self {
        Self {
            categories,
            protected: Vec::new(),
        }
    }

    /// Never move the file at `path`, even if it sits in the organized
    /// directory (the journal file and the error log, for instance).
    pub fn protect(mut self, path: impl Into<PathBuf>) -> Self {
        self.protected.push(path.into());
        self
    }

    fn is_protected(&self, file: &Path) -> bool {
        self.protected.iter().any(|protected| {
            fs::canonicalize(protected)
                .map(|p| p == file)
                .unwrap_or(false)
        })
    }

    /// Lists the files of `directory` that would be organized, with their
    /// target categories, without touching anything.
    pub fn plan(&self, directory: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        let directory = canonical_dir(directory)?;
        Ok(immediate_files(&directory)?
            .into_iter()
            .filter(|file| !self.is_protected(file))
            .map(|file| PlannedMove {
                category: self.categories.resolve_path(&file).to_string(),
                source: file,
            })
            .collect())
    }

    /// Moves every immediate file of `directory` into
    /// `directory/<category>/`, recording successful moves in `store`.
    ///
    /// `progress(done, total)` is called after each file.
    ///
    /// # Errors
    ///
    /// Only fails as a whole if `directory` is missing or unreadable.
    /// Per-file failures are reported as [`FileOutcome::Failed`], and a
    /// journal write failure as `journal_saved == false`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filedock::file_category::CategoryMap;
    /// use filedock::file_organizer::FileOrganizer;
    /// use filedock::journal::FileJournalStore;
    /// use std::path::Path;
    ///
    /// let categories = CategoryMap::default();
    /// let store = FileJournalStore::default();
    /// let report = FileOrganizer::new(&categories)
    ///     .organize(Path::new("/downloads"), &store, |done, total| {
    ///         println!("{}/{}", done, total);
    ///     })?;
    /// println!("moved {} files", report.moved_count());
    /// # Ok::<(), filedock::OrganizeError>(())
    /// ```
    pub fn organize(
        &self,
        directory: &Path,
        store: &dyn JournalStore,
        mut progress: impl FnMut(usize, usize),
    ) -> OrganizeResult<OrganizeReport> {
        let plan = self.plan(directory)?;
        let total = plan.len();
        let mut report = OrganizeReport::default();

        info!(directory = %directory.display(), files = total, "organizing");

        for (index, planned) in plan.into_iter().enumerate() {
            let outcome = self.organize_file(&planned);
            if let FileOutcome::Failed { path, reason } = &outcome {
                error!(path = %path.display(), %reason, "failed to organize file");
            }
            report.outcomes.push(outcome);
            progress(index + 1, total);
        }

        let moves: Vec<MoveRecord> = report.records().cloned().collect();
        if !moves.is_empty() {
            match store.persist(&moves) {
                Ok(()) => report.journal_saved = true,
                Err(e) => error!(error = %e, "could not save undo journal"),
            }
        }

        if report.outcomes.len() != moves.len() {
            warn!(
                moved = moves.len(),
                failed = report.outcomes.len() - moves.len(),
                "organize finished with errors"
            );
        }

        Ok(report)
    }

    fn organize_file(&self, planned: &PlannedMove) -> FileOutcome {
        let Some(file_name) = planned.source.file_name() else {
            return FileOutcome::Failed {
                path: planned.source.clone(),
                reason: "file has no name component".to_string(),
            };
        };
        let Some(directory) = planned.source.parent() else {
            return FileOutcome::Failed {
                path: planned.source.clone(),
                reason: "file has no parent directory".to_string(),
            };
        };

        let destination = directory.join(&planned.category).join(file_name);
        match safe_move(&planned.source, &destination) {
            Ok(new_path) => FileOutcome::Moved(MoveRecord {
                original_path: planned.source.clone(),
                new_path,
            }),
            Err(e) => FileOutcome::Failed {
                path: planned.source.clone(),
                reason: e.to_string(),
            },
        }
    }
}

fn canonical_dir(directory: &Path) -> OrganizeResult<PathBuf> {
    if !directory.is_dir() {
        return Err(OrganizeError::not_a_directory(directory));
    }
    fs::canonicalize(directory).map_err(|e| OrganizeError::InvalidBasePath {
        path: directory.to_path_buf(),
        source: e,
    })
}
