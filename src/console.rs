//! Colored console output for sweep progress and results.

use crate::types::{Classification, DeletionOutcome, RepoOutcome, SweepReport};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Console output handler with colors and formatting.
pub struct ConsoleOutput {
    verbose: bool,
    quiet: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print sweep start message.
    pub fn print_org_start(&self, org: &str) {
        if self.quiet {
            return;
        }

        println!("{} Sweeping organization: {}", "[*]".bright_blue(), org.bright_white());
    }

    /// Print progress detail (only in verbose mode).
    pub fn print_progress(&self, message: &str) {
        if !self.verbose {
            return;
        }

        println!("{} {}", "[.]".dimmed(), message.dimmed());
    }

    /// Print a skipped repository.
    pub fn print_skip(&self, full_name: &str, reason: &dyn std::fmt::Display) {
        if self.quiet {
            return;
        }

        println!(
            "{} {} skipped: {}",
            "[-]".dimmed(),
            full_name,
            reason.to_string().dimmed()
        );
    }

    /// Print one classification verdict.
    pub fn print_outcome(&self, outcome: &RepoOutcome) {
        if self.quiet {
            return;
        }

        let repo = outcome.repo.full_name.as_str();
        match &outcome.classification {
            Classification::Registered {
                package,
                latest_version,
            } => {
                let version = latest_version
                    .as_deref()
                    .map(|v| format!("@{}", v))
                    .unwrap_or_default();
                println!(
                    "{} {} publishes {}{} - keeping",
                    "[=]".green(),
                    repo,
                    package.bright_white(),
                    version.dimmed()
                );
            }
            Classification::Unregistered { package } => {
                println!(
                    "{} {} package {} {}",
                    "[!]".red().bold(),
                    repo.bright_white(),
                    package.bright_white(),
                    "NOT ON REGISTRY - marked for deletion".red().bold()
                );
            }
            Classification::Indeterminate { package, error } => {
                println!(
                    "{} {} package {} lookup failed ({}) - keeping",
                    "[?]".yellow(),
                    repo,
                    package,
                    error.yellow()
                );
            }
            Classification::Skipped { reason } => self.print_skip(repo, reason),
        }
    }

    /// Print the full deletion candidate list before any destructive action.
    pub fn print_candidates(&self, candidates: &[String]) {
        if candidates.is_empty() {
            if !self.quiet {
                println!("{} Nothing to delete.", "[*]".bright_blue());
            }
            return;
        }

        println!();
        println!(
            "{} {}",
            "[!]".red().bold(),
            format!("Deleting {} repositories:", candidates.len()).red().bold()
        );
        for candidate in candidates {
            println!("    - {}", candidate);
        }
    }

    /// Print one deletion result.
    pub fn print_deletion(&self, outcome: &DeletionOutcome) {
        match &outcome.error {
            None => println!("{} Deleted {}", "[x]".red(), outcome.full_name),
            Some(cause) => println!(
                "{} Failed to delete {}: {}",
                "[!]".yellow().bold(),
                outcome.full_name,
                cause.yellow()
            ),
        }
    }

    /// Print sweep summary.
    pub fn print_summary(&self, report: &SweepReport) {
        let deleted = report.deletions.iter().filter(|d| d.succeeded()).count();
        let failed = report.deletions.len() - deleted;

        // In quiet mode, only surface runs that actually changed something.
        if self.quiet && report.candidates.is_empty() && report.errors.is_empty() {
            return;
        }

        println!();
        println!("{}", "=== Sweep Summary ===".bright_cyan());
        println!("  Organizations: {}", report.organizations.join(", "));
        println!("  Duration:      {:.2}s", report.duration_secs);
        println!("  Repositories:  {}", report.processed);
        println!("  Skipped:       {}", report.skipped);
        println!("  Published:     {}", report.registered);
        println!("  Indeterminate: {}", report.indeterminate);

        if report.candidates.is_empty() {
            println!("  {}", "No orphaned repositories found.".green());
        } else if report.deletions.is_empty() {
            println!(
                "  {}",
                format!("DRY RUN: {} repositories would be deleted", report.candidates.len())
                    .yellow()
                    .bold()
            );
        } else {
            println!(
                "  {}",
                format!("Deleted: {} ({} failed)", deleted, failed).red().bold()
            );
        }

        if !report.errors.is_empty() {
            println!();
            println!("{}", "Errors encountered:".yellow());
            for error in &report.errors {
                println!("  - {}", error.dimmed());
            }
        }

        println!();
    }

    /// Create a progress bar for the deletion batch.
    pub fn create_progress_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if self.quiet || total == 0 {
            return None;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message(message.to_string());
        Some(pb)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_output_creation() {
        let output = ConsoleOutput::new(true, false);
        assert!(output.verbose);
        assert!(!output.quiet);
    }

    #[test]
    fn test_no_bar_for_empty_batch() {
        let output = ConsoleOutput::default();
        assert!(output.create_progress_bar(0, "Deleting").is_none());
    }
}
