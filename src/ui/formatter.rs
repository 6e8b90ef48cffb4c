//! Pure formatting functions for UI output.
//!
//! Display logic is kept apart from user interaction so prompts can be
//! swapped out and the formatting stays testable.

use console::style;

use crate::cli::orchestration::{ReleasePlan, RunReport};
use crate::warning::RunWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal run warning.
pub fn display_warning(warning: &RunWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Lines describing a dry run: names, paths, and the version file before/after.
pub fn format_release_plan(plan: &ReleasePlan) -> Vec<String> {
    let d = &plan.descriptor;
    let mut lines = vec![
        format!("Release:  {}", d.base_name),
        format!("Version:  {} -> {}", plan.version, plan.next_version),
        format!("Source:   {}", d.source().display()),
        format!("Staging:  {}", d.staging_dir().display()),
        format!("Archive:  {}", d.staged_archive().display()),
        format!("Publish:  {}", d.release_archive().display()),
        "Version file after release:".to_string(),
    ];
    lines.extend(plan.incremented.lines().map(|line| format!("  | {}", line)));
    lines
}

/// Print the dry-run plan.
pub fn display_release_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Dry run, nothing will be written:").bold());
    for line in format_release_plan(plan) {
        println!("  {}", line);
    }
}

/// Print the summary of a finished run.
pub fn display_run_report(report: &RunReport) {
    println!(
        "\n{} Released {} ({} files), version is now {}",
        style("✓").green(),
        style(&report.descriptor.archive_name).bold(),
        report.staged_files,
        report.next_version
    );
    if let Some(path) = &report.published {
        println!("  {}", style(path.display()).cyan());
    }
    if !report.warnings.is_empty() {
        println!(
            "  {} warning(s) during the run",
            style(report.warnings.len()).yellow()
        );
    }
}
