//! Command-line interface module for filedock.
//!
//! This module handles all CLI-related functionality including:
//! - Command parsing (clap)
//! - Configuration loading
//! - Organization, undo and query orchestration
//! - Rendering results through [`OutputFormatter`]

use crate::config::CategoryConfig;
use crate::duplicates::{DuplicateScan, delete_files};
use crate::file_category::CategoryMap;
use crate::file_organizer::{FileOrganizer, FileOutcome};
use crate::journal::{DEFAULT_JOURNAL_FILE, FileJournalStore};
use crate::logging::DEFAULT_LOG_FILE;
use crate::metadata::{recent_files, top_n_large};
use crate::output::OutputFormatter;
use crate::preview::tally;
use crate::undo::UndoManager;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "filedock")]
#[command(about = "Organize a folder into category subfolders, undo it, and find duplicates")]
#[command(version)]
pub struct Args {
    /// Category configuration file (TOML, or JSON by extension)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Undo journal location
    #[arg(long, global = true, default_value = DEFAULT_JOURNAL_FILE)]
    pub journal: PathBuf,

    /// Error log location
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Mirror log events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// The options shared by every command.
    pub fn options(&self) -> CliOptions {
        CliOptions {
            config: self.config.clone(),
            journal: self.journal.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move files into category subfolders
    Organize {
        directory: PathBuf,
        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Revert the last organize run
    Undo,
    /// Count files per category
    Preview { directory: PathBuf },
    /// List the largest files
    Large {
        directory: PathBuf,
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
    /// List files modified recently
    Recent {
        directory: PathBuf,
        #[arg(long, default_value_t = 7)]
        days: u64,
    },
    /// Find files with identical content
    Duplicates {
        directory: PathBuf,
        /// Keep the first file of each group and delete the rest
        #[arg(long)]
        delete: bool,
    },
    /// Show the category an extension maps to
    Resolve { extension: String },
}

/// Paths the commands operate with besides their directory argument.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub journal: PathBuf,
    pub log_file: PathBuf,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config: None,
            journal: PathBuf::from(DEFAULT_JOURNAL_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Runs a command.
///
/// Loads the category configuration first; a broken configuration stops
/// every command.
///
/// # Examples
///
/// ```no_run
/// use filedock::cli::{CliOptions, Command, run_cli};
/// use std::path::PathBuf;
///
/// let command = Command::Organize { directory: PathBuf::from("/downloads"), dry_run: true };
/// if let Err(e) = run_cli(command, &CliOptions::default()) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(command: Command, options: &CliOptions) -> Result<(), String> {
    let categories = CategoryConfig::load(options.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?
        .into_category_map();

    match command {
        Command::Organize { directory, dry_run } => {
            if dry_run {
                organize_dry_run(&directory, &categories, options)
            } else {
                organize_directory(&directory, &categories, options)
            }
        }
        Command::Undo => undo_organization(options),
        Command::Preview { directory } => show_preview(&directory, &categories, options),
        Command::Large { directory, count } => show_large(&directory, count),
        Command::Recent { directory, days } => show_recent(&directory, days),
        Command::Duplicates { directory, delete } => show_duplicates(&directory, delete),
        Command::Resolve { extension } => {
            OutputFormatter::plain(&format!("{} → {}", extension, categories.resolve(&extension)));
            Ok(())
        }
    }
}

fn organizer<'a>(categories: &'a CategoryMap, options: &CliOptions) -> FileOrganizer<'a> {
    FileOrganizer::new(categories)
        .protect(&options.journal)
        .protect(&options.log_file)
}

fn organize_directory(
    base_path: &Path,
    categories: &CategoryMap,
    options: &CliOptions,
) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", base_path.display()));

    let store = FileJournalStore::new(&options.journal);
    let progress_bar = OutputFormatter::create_progress_bar(0);
    let report = organizer(categories, options)
        .organize(base_path, &store, |done, total| {
            progress_bar.set_length(total as u64);
            progress_bar.set_position(done as u64);
        })
        .map_err(|e| e.to_string())?;
    progress_bar.finish_and_clear();

    if report.outcomes.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    let mut moved_counts: IndexMap<String, usize> = IndexMap::new();
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Moved(record) => {
                let relative = record
                    .new_path
                    .strip_prefix(record.original_path.parent().unwrap_or(Path::new("")))
                    .unwrap_or(&record.new_path);
                OutputFormatter::success(&format!(
                    "{} → {}",
                    display_name(&record.original_path),
                    relative.display()
                ));
                if let Some(category) = relative.components().next() {
                    *moved_counts
                        .entry(category.as_os_str().to_string_lossy().to_string())
                        .or_insert(0) += 1;
                }
            }
            FileOutcome::Failed { path, reason } => {
                OutputFormatter::error(&format!("{}: {}", display_name(path), reason));
            }
        }
    }

    if !moved_counts.is_empty() {
        OutputFormatter::summary_table(&moved_counts);
    }

    let errors = report.errors();
    let mut status = format!("Moved {} files.", report.moved_count());
    if !errors.is_empty() {
        status.push_str(&format!(" {} errors (see {}).", errors.len(), options.log_file.display()));
    }

    if errors.is_empty() {
        OutputFormatter::success(&status);
    } else {
        OutputFormatter::warning(&status);
    }

    if report.journal_saved {
        OutputFormatter::plain("History saved. Use 'filedock undo' to revert changes.");
    } else if report.moved_count() > 0 {
        OutputFormatter::warning("Could not save undo history; undo will not be available.");
    }

    Ok(())
}

fn organize_dry_run(
    base_path: &Path,
    categories: &CategoryMap,
    options: &CliOptions,
) -> Result<(), String> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", base_path.display()));

    let plan = organizer(categories, options)
        .plan(base_path)
        .map_err(|e| e.to_string())?;

    if plan.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    for planned in &plan {
        OutputFormatter::plain(&format!(
            " - {} → would move to {}/",
            display_name(&planned.source),
            planned.category
        ));
    }

    OutputFormatter::summary_table(&tally(categories, &plan));
    OutputFormatter::dry_run_notice("No files were modified.");
    Ok(())
}

fn undo_organization(options: &CliOptions) -> Result<(), String> {
    OutputFormatter::info("Undoing previous organization...");

    let store = FileJournalStore::new(&options.journal);
    let report = UndoManager::undo(&store);

    if !report.journal_found {
        OutputFormatter::warning(&report.message);
        return Ok(());
    }

    for (original, actual) in &report.renamed {
        OutputFormatter::warning(&format!(
            "{} was occupied, restored as {}",
            original.display(),
            display_name(actual)
        ));
    }
    for (path, reason) in &report.skipped_files {
        OutputFormatter::warning(&format!("Skipped {}: {}", path.display(), reason));
    }
    for (path, reason) in &report.failed_restores {
        OutputFormatter::error(&format!("{}: {}", path.display(), reason));
    }

    if report.is_complete_success() {
        OutputFormatter::success(&report.message);
    } else {
        OutputFormatter::warning(&report.message);
    }
    Ok(())
}

/// Counts what `organize` would move, so the journal and log are left out
/// here as well.
fn show_preview(
    base_path: &Path,
    categories: &CategoryMap,
    options: &CliOptions,
) -> Result<(), String> {
    let plan = organizer(categories, options)
        .plan(base_path)
        .map_err(|e| e.to_string())?;
    OutputFormatter::summary_table(&tally(categories, &plan));
    Ok(())
}

fn show_large(base_path: &Path, count: usize) -> Result<(), String> {
    let files = top_n_large(base_path, count).map_err(|e| e.to_string())?;
    OutputFormatter::header(&format!("Top large files (Top {}):", count));
    if files.is_empty() {
        OutputFormatter::plain("No files found.");
    }
    for file in files {
        OutputFormatter::plain(&format!(
            "{:>12}  {}",
            OutputFormatter::human_size(file.size_bytes),
            file.path.display()
        ));
    }
    Ok(())
}

fn show_recent(base_path: &Path, days: u64) -> Result<(), String> {
    let files = recent_files(base_path, days).map_err(|e| e.to_string())?;
    OutputFormatter::header(&format!("Recent files (last {} days):", days));
    if files.is_empty() {
        OutputFormatter::plain("No recent files.");
    }
    for file in files {
        let modified: DateTime<Local> = file.modified.into();
        OutputFormatter::plain(&format!(
            "{}  {}",
            modified.format("%Y-%m-%d %H:%M:%S"),
            file.path.display()
        ));
    }
    Ok(())
}

fn show_duplicates(base_path: &Path, delete: bool) -> Result<(), String> {
    let mut scan = DuplicateScan::spawn(base_path).map_err(|e| e.to_string())?;
    let spinner = OutputFormatter::create_spinner("Scanning for duplicates...");
    let groups = loop {
        if let Some(result) = scan.wait_timeout(Duration::from_millis(100)) {
            break result.map_err(|e| e.to_string())?;
        }
    };
    spinner.finish_and_clear();

    if groups.is_empty() {
        OutputFormatter::success("No duplicates found.");
        return Ok(());
    }

    let entries: usize = groups.iter().map(|(_, paths)| paths.len()).sum();
    OutputFormatter::header(&format!(
        "Scan complete - {} groups, {} file entries.",
        groups.len(),
        entries
    ));
    for (hash, paths) in groups.iter() {
        OutputFormatter::info(&hash[..16.min(hash.len())]);
        for path in paths {
            OutputFormatter::plain(&format!("    {}", path.display()));
        }
    }

    if delete {
        let report = delete_files(&groups.redundant_paths());
        for (path, reason) in &report.failed {
            OutputFormatter::error(&format!("{}: {}", path.display(), reason));
        }
        OutputFormatter::success(&format!("Deleted {} files.", report.deleted.len()));
    }

    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organize_command() {
        let args = Args::parse_from(["filedock", "organize", "/tmp/inbox", "--dry-run"]);
        match args.command {
            Command::Organize { directory, dry_run } => {
                assert_eq!(directory, PathBuf::from("/tmp/inbox"));
                assert!(dry_run);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(args.journal, PathBuf::from(DEFAULT_JOURNAL_FILE));
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let args = Args::parse_from([
            "filedock",
            "large",
            "/tmp/inbox",
            "-n",
            "3",
            "--journal",
            "/tmp/j.json",
        ]);
        assert!(matches!(args.command, Command::Large { count: 3, .. }));
        assert_eq!(args.options().journal, PathBuf::from("/tmp/j.json"));
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["filedock", "recent", "/tmp/inbox"]);
        assert!(matches!(args.command, Command::Recent { days: 7, .. }));
        assert!(!args.verbose);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/a/b/c.txt")), "c.txt");
    }
}
