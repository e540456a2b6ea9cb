//! Error types shared across the engine.
//!
//! Configuration errors are fatal at startup. Organize errors cover the
//! operations that can fail as a whole (missing directory, journal writes,
//! worker spawn) as well as the per-file failures that the batch operations
//! collect into their reports instead of propagating.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the category configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed into a category mapping.
    #[error("Invalid configuration {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The base directory path is invalid or doesn't exist.
    #[error("Invalid base path {}: {source}", path.display())]
    InvalidBasePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the undo journal.
    #[error("Failed to write undo journal {}: {source}", path.display())]
    JournalWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The undo journal could not be serialized.
    #[error("Failed to serialize undo journal: {0}")]
    JournalSerialize(#[from] serde_json::Error),

    /// A background worker thread could not be started.
    #[error("Failed to start background worker: {0}")]
    WorkerSpawnFailed(#[source] std::io::Error),

    /// A background worker exited (e.g. panicked) without sending a result.
    #[error("Background scan of {} stopped without a result", path.display())]
    WorkerLost { path: PathBuf },
}

impl OrganizeError {
    /// Builds an `InvalidBasePath` error for a directory that is missing or
    /// is not a directory.
    pub(crate) fn not_a_directory(path: &std::path::Path) -> Self {
        OrganizeError::InvalidBasePath {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "directory does not exist",
            ),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_file_move_failure_message() {
        let error = OrganizeError::FileMoveFailure {
            from: PathBuf::from("/tmp/a.txt"),
            to: PathBuf::from("/tmp/DOCS/a.txt"),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/tmp/a.txt"));
        assert!(message.contains("/tmp/DOCS/a.txt"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_not_a_directory_is_invalid_base_path() {
        let error = OrganizeError::not_a_directory(std::path::Path::new("/missing"));
        assert!(matches!(error, OrganizeError::InvalidBasePath { .. }));
        assert!(error.to_string().contains("/missing"));
    }

    #[test]
    fn test_config_error_messages() {
        let error = ConfigError::NotFound(PathBuf::from("filedock.toml"));
        assert!(error.to_string().contains("not found"));

        let error = ConfigError::Invalid {
            path: PathBuf::from("filedock.toml"),
            reason: "expected table".to_string(),
        };
        assert!(error.to_string().contains("expected table"));
    }

    #[test]
    fn test_serde_error_converts() {
        fn parse() -> OrganizeResult<serde_json::Value> {
            Ok(serde_json::from_str("{not json")?)
        }
        assert!(matches!(parse(), Err(OrganizeError::JournalSerialize(_))));
    }
}
