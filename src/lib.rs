//! filedock - folder organization with undo and integrity checks
//!
//! This library sorts the files of a folder into category subfolders by
//! extension, journals every move so the last run can be reverted, finds
//! files with identical content by BLAKE3 digest, and answers size and
//! recency queries over a folder.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod journal;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod preview;
pub mod scan;
pub mod undo;

pub use config::CategoryConfig;
pub use duplicates::{DeleteReport, DuplicateGroups, DuplicateScan, delete_files, find_duplicates};
pub use error::{ConfigError, OrganizeError, OrganizeResult};
pub use file_category::{CategoryMap, CategoryTable, FALLBACK};
pub use file_organizer::{FileOrganizer, FileOutcome, OrganizeReport, safe_move};
pub use journal::{FileJournalStore, JournalStore, MemoryJournalStore, MoveRecord, OrganizeJournal};
pub use metadata::{LargeFile, RecentFile, recent_files, top_n_large};
pub use preview::{preview_counts, tally};
pub use undo::{UndoManager, UndoReport};

pub use cli::{CliOptions, Command, run_cli};
