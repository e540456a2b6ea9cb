//! Error log sink.
//!
//! Every failure the engine catches is reported as a `tracing` event. This
//! module wires those events into an append-only log file with timestamps.
//! Logging must never take the engine down: if the log file cannot be opened
//! the file layer is simply left out, and write errors inside the
//! non-blocking writer are dropped.

use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "filedock.log";

/// Environment variable holding the log filter (e.g. `debug`).
pub const LOG_FILTER_ENV: &str = "FILEDOCK_LOG";

/// Installs the global subscriber.
///
/// Events go to `log_file` (appended, never rotated). With `verbose`, they
/// are mirrored to stderr as well. The returned guard flushes the file
/// writer on drop and must be kept alive for the program's lifetime; it is
/// `None` when the log file could not be opened.
pub fn init_logger(log_file: &Path, verbose: bool) -> Option<WorkerGuard> {
    let filter = env::var(LOG_FILTER_ENV).unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match open_appender(log_file) {
        Some(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(non_blocking).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let console_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
    });

    // Already initialized (tests, embedding): keep the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}

fn open_appender(log_file: &Path) -> Option<RollingFileAppender> {
    let file_name = log_file.file_name()?.to_string_lossy().to_string();
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .ok()
}
