//! Directory listing shared by every operation.
//!
//! All scans look at the immediate file children of one directory only.
//! Category folders created by an earlier organize run are subdirectories
//! and are therefore never revisited.

use crate::error::{OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Lists the regular files directly inside `directory`, sorted by file name.
///
/// The name order is the "discovery order" every other operation relies on
/// for stable tie-breaking. Entries that cannot be inspected are logged and
/// skipped.
///
/// # Errors
///
/// Returns `OrganizeError::InvalidBasePath` if `directory` is missing, is
/// not a directory, or cannot be read.
pub fn immediate_files(directory: &Path) -> OrganizeResult<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(OrganizeError::not_a_directory(directory));
    }

    let entries = fs::read_dir(directory).map_err(|e| OrganizeError::InvalidBasePath {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(directory = %directory.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        // Follows symlinks, so a link to a file counts as a file.
        match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "skipping entry without metadata");
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
