/// Persistence of the most recent organize run.
///
/// Exactly one journal exists at a time. A new organize run that moved at
/// least one file overwrites it; undo consumes and deletes it. The store is
/// injected into the organize and undo operations through the
/// [`JournalStore`] trait rather than living in global state.
use crate::error::{OrganizeError, OrganizeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Default journal file name, relative to the working directory.
pub const DEFAULT_JOURNAL_FILE: &str = "undo_log.json";

/// One completed relocation.
///
/// `new_path` pointed to a fresh, previously unused path at the moment the
/// record was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Absolute path of the file before it was moved.
    pub original_path: PathBuf,
    /// Absolute path the file was moved to.
    pub new_path: PathBuf,
}

/// The moves of one organize run, in the order they were performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeJournal {
    /// RFC 3339 timestamp of when the journal was written.
    pub timestamp: String,
    /// Moves in performed order.
    pub moves: Vec<MoveRecord>,
}

impl OrganizeJournal {
    /// Creates a journal stamped with the current local time.
    pub fn new(moves: Vec<MoveRecord>) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            moves,
        }
    }
}

/// A single-slot store for the undo journal.
pub trait JournalStore {
    /// Overwrites the stored journal with `moves` and the current timestamp.
    fn persist(&self, moves: &[MoveRecord]) -> OrganizeResult<()>;

    /// Returns the stored journal, or `None` if absent or unreadable.
    fn load(&self) -> Option<OrganizeJournal>;

    /// Removes the stored journal. Idempotent; never fails.
    fn clear(&self);
}

/// Stores the journal as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileJournalStore {
    path: PathBuf,
}

impl FileJournalStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileJournalStore {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_FILE)
    }
}

impl JournalStore for FileJournalStore {
    fn persist(&self, moves: &[MoveRecord]) -> OrganizeResult<()> {
        let journal = OrganizeJournal::new(moves.to_vec());
        let json_string = serde_json::to_string_pretty(&journal)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::JournalWriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }

        fs::write(&self.path, json_string).map_err(|e| OrganizeError::JournalWriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(path = %self.path.display(), moves = moves.len(), "undo journal written");
        Ok(())
    }

    fn load(&self) -> Option<OrganizeJournal> {
        if !self.path.exists() {
            return None;
        }

        let json_string = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read undo journal");
                return None;
            }
        };

        match serde_json::from_str(&json_string) {
            Ok(journal) => Some(journal),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "undo journal is corrupt, ignoring it");
                None
            }
        }
    }

    fn clear(&self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not delete undo journal");
        }
    }
}

/// Keeps the journal in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryJournalStore {
    slot: Mutex<Option<OrganizeJournal>>,
}

impl MemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalStore for MemoryJournalStore {
    fn persist(&self, moves: &[MoveRecord]) -> OrganizeResult<()> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(OrganizeJournal::new(moves.to_vec()));
        Ok(())
    }

    fn load(&self) -> Option<OrganizeJournal> {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn clear(&self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(from: &str, to: &str) -> MoveRecord {
        MoveRecord {
            original_path: PathBuf::from(from),
            new_path: PathBuf::from(to),
        }
    }

    #[test]
    fn test_file_store_round_trip_preserves_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileJournalStore::new(temp_dir.path().join("undo_log.json"));

        let moves = vec![
            record("/d/a.txt", "/d/DOCS/a.txt"),
            record("/d/b.jpg", "/d/IMAGES/b.jpg"),
        ];
        store.persist(&moves).expect("Failed to persist journal");

        let journal = store.load().expect("Journal should load");
        assert_eq!(journal.moves, moves);
        assert!(chrono::DateTime::parse_from_rfc3339(&journal.timestamp).is_ok());
    }

    #[test]
    fn test_file_store_overwrites_previous_journal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileJournalStore::new(temp_dir.path().join("undo_log.json"));

        store.persist(&[record("/d/a.txt", "/d/DOCS/a.txt")]).unwrap();
        store.persist(&[record("/d/c.mp3", "/d/AUDIO/c.mp3")]).unwrap();

        let journal = store.load().unwrap();
        assert_eq!(journal.moves.len(), 1);
        assert_eq!(journal.moves[0].original_path, PathBuf::from("/d/c.mp3"));
    }

    #[test]
    fn test_file_store_missing_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileJournalStore::new(temp_dir.path().join("undo_log.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_corrupt_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("undo_log.json");
        fs::write(&path, "{ \"timestamp\": 12, \"moves\": ").unwrap();

        let store = FileJournalStore::new(&path);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileJournalStore::new(temp_dir.path().join("undo_log.json"));

        store.persist(&[record("/d/a.txt", "/d/DOCS/a.txt")]).unwrap();
        store.clear();
        assert!(!store.path().exists());
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileJournalStore::new(temp_dir.path().join("state").join("undo_log.json"));
        store.persist(&[record("/d/a.txt", "/d/DOCS/a.txt")]).unwrap();
        assert!(store.load().is_some());
    }

    #[test]
    fn test_memory_store_single_slot() {
        let store = MemoryJournalStore::new();
        assert!(store.load().is_none());

        store.persist(&[record("/d/a.txt", "/d/DOCS/a.txt")]).unwrap();
        store.persist(&[record("/d/b.txt", "/d/DOCS/b.txt")]).unwrap();
        let journal = store.load().unwrap();
        assert_eq!(journal.moves, vec![record("/d/b.txt", "/d/DOCS/b.txt")]);

        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }
}
