/// Undo functionality for reverting file organization operations.
///
/// This module moves files back to their original locations based on the
/// journal written by the last organize run. Undo is single-use: the journal
/// is deleted afterwards whether or not every file could be restored.
use crate::file_organizer::free_path;
use crate::journal::{JournalStore, MoveRecord};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Whether there was a journal to undo at all.
    pub journal_found: bool,
    /// Number of files successfully restored.
    pub restored_files: usize,
    /// Files restored under an alternate name because their original path
    /// was occupied: `(original_path, actual_path)`.
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Files that were no longer where the journal expected them.
    pub skipped_files: Vec<(PathBuf, String)>,
    /// Files that could not be moved back.
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Human-readable summary.
    pub message: String,
}

impl UndoReport {
    /// Returns true if every journaled file was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }

    /// Returns the total number of journal records processed.
    ///
    /// # Returns
    ///
    /// Restored plus skipped plus failed. Equals the journal length when a
    /// journal was found.
    pub fn total_processed(&self) -> usize {
        self.restored_files + self.failed_restores.len() + self.skipped_files.len()
    }
}

/// Reason a single record could not be restored.
enum RestoreFailure {
    Missing(String),
    Failed(String),
}

/// Manages undo operations for file organization.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent file organization operation.
    ///
    /// Records are processed last-moved-first.
    ///
    /// # Edge Cases Handled
    ///
    /// * **No journal**: nothing happens; the report says so
    /// * **File not found**: skipped, the remaining records still run
    /// * **Original path occupied**: restored as `{stem}_restored{N}{.ext}`
    ///   next to the original, nothing is overwritten
    /// * **Permission denied**: recorded as a failure with the error reason
    ///
    /// # Arguments
    ///
    /// * `store` - Where the last organize run left its journal. The journal
    ///   is cleared before this returns.
    ///
    /// # Returns
    ///
    /// An `UndoReport` with restored, renamed, skipped and failed records and
    /// the summary message shown to the user.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filedock::journal::FileJournalStore;
    /// use filedock::undo::UndoManager;
    ///
    /// let report = UndoManager::undo(&FileJournalStore::default());
    /// println!("{}", report.message);
    /// ```
    pub fn undo(store: &dyn JournalStore) -> UndoReport {
        let Some(journal) = store.load() else {
            return UndoReport {
                message: "No undo data found.".to_string(),
                ..UndoReport::default()
            };
        };

        info!(
            moves = journal.moves.len(),
            written = %journal.timestamp,
            "undoing last organize"
        );

        let mut report = UndoReport {
            journal_found: true,
            ..UndoReport::default()
        };

        for record in journal.moves.iter().rev() {
            match Self::restore_file(record) {
                Ok(restored_to) => {
                    report.restored_files += 1;
                    if restored_to != record.original_path {
                        report
                            .renamed
                            .push((record.original_path.clone(), restored_to));
                    }
                }
                Err(RestoreFailure::Missing(reason)) => {
                    warn!(path = %record.new_path.display(), %reason, "skipping restore");
                    report.skipped_files.push((record.new_path.clone(), reason));
                }
                Err(RestoreFailure::Failed(reason)) => {
                    error!(path = %record.new_path.display(), %reason, "restore failed");
                    report.failed_restores.push((record.new_path.clone(), reason));
                }
            }
        }

        store.clear();

        report.message = format!("Restored {} files.", report.restored_files);
        if !report.is_complete_success() {
            report
                .message
                .push_str(" Some errors occurred; check the error log.");
        }
        report
    }

    /// Restores a single file, returning where it ended up.
    fn restore_file(record: &MoveRecord) -> Result<PathBuf, RestoreFailure> {
        if fs::symlink_metadata(&record.new_path).is_err() {
            return Err(RestoreFailure::Missing(
                "File not found at expected location".to_string(),
            ));
        }

        if let Some(parent) = record.original_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                RestoreFailure::Failed(format!("Could not recreate {}: {}", parent.display(), e))
            })?;
        }

        let target = free_path(&record.original_path, "_restored");

        fs::rename(&record.new_path, &target)
            .map_err(|e| RestoreFailure::Failed(format!("Failed to restore file: {}", e)))?;

        Ok(target)
    }
}
