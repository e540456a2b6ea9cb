//! Size and recency rankings over a directory's immediate files.

use crate::error::OrganizeResult;
use crate::scan::immediate_files;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::warn;

const SECONDS_PER_DAY: u64 = 86_400;

/// A file and its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// A file and its last modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Returns up to `n` files sorted by size, largest first.
///
/// Files of equal size keep their discovery order.
pub fn top_n_large(directory: &Path, n: usize) -> OrganizeResult<Vec<LargeFile>> {
    let mut files: Vec<LargeFile> = immediate_files(directory)?
        .into_iter()
        .filter_map(|path| match fs::metadata(&path) {
            Ok(metadata) => Some(LargeFile {
                size_bytes: metadata.len(),
                path,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not stat file");
                None
            }
        })
        .collect();

    // sort_by is stable
    files.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    files.truncate(n);
    Ok(files)
}

/// Returns the files modified within the last `days` days, newest first.
pub fn recent_files(directory: &Path, days: u64) -> OrganizeResult<Vec<RecentFile>> {
    let window = Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY));
    let cutoff = SystemTime::now()
        .checked_sub(window)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    recent_files_since(directory, cutoff)
}

/// Returns the files modified at or after `cutoff`, newest first.
pub fn recent_files_since(directory: &Path, cutoff: SystemTime) -> OrganizeResult<Vec<RecentFile>> {
    let mut files: Vec<RecentFile> = immediate_files(directory)?
        .into_iter()
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified());
            match modified {
                Ok(modified) => Some(RecentFile { path, modified }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read modification time");
                    None
                }
            }
        })
        .filter(|file| file.modified >= cutoff)
        .collect();

    files.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(files)
}
