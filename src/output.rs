//! Terminal rendering for the filedock CLI.
//!
//! Every line the binary prints goes through [`OutputFormatter`], so colors,
//! symbols and progress widgets stay consistent across commands.

use colored::*;
use indexmap::IndexMap;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Stateless printer used by every CLI command.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green check line on stdout.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Yellow warning line on stdout.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Cyan status line, used for "what is about to happen" messages.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Unstyled line on stdout.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Bold header preceded by a blank line.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Marks output that describes moves without performing them.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Formats a byte count for display.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Size in bytes
    ///
    /// # Returns
    ///
    /// A binary-unit string such as `"1.50 MiB"`.
    ///
    /// # Example
    ///
    /// ```
    /// use filedock::output::OutputFormatter;
    /// assert_eq!(OutputFormatter::human_size(512), "512 B");
    /// ```
    pub fn human_size(bytes: u64) -> String {
        HumanBytes(bytes).to_string()
    }

    /// Bar for the organize loop. The length may be set later with
    /// `set_length` once the file count is known.
    ///
    /// # Arguments
    ///
    /// * `total` - Initial length; 0 when not yet known
    ///
    /// # Example
    ///
    /// ```no_run
    /// use filedock::output::OutputFormatter;
    /// let bar = OutputFormatter::create_progress_bar(0);
    /// bar.set_length(3);
    /// bar.inc(1);
    /// bar.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar
    }

    /// Creates a ticking spinner for work of unknown length.
    pub fn create_spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        spinner.set_message(message.to_string());
        spinner
    }

    /// Prints per-category file counts with a total row.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Category → count, printed in map order
    ///
    /// Categories with a zero count are listed too, so the table always
    /// shows the full set of destinations.
    pub fn summary_table(category_counts: &IndexMap<String, usize>) {
        Self::header("Files per category");

        let total_files: usize = category_counts.values().sum();
        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let count_text = if *count == 0 {
                count.to_string().dimmed()
            } else {
                count.to_string().green()
            };
            println!(
                "{:<width$} | {} {}",
                category,
                count_text,
                plural(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
