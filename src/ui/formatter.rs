//! Pure formatting functions for UI output.
//!
//! `format_*` functions build the text; `display_*` functions print it.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::processor::{ProcessReport, ReplacementReport, VersionSource};
use crate::replace::ReplacementOutcome;

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

/// Print a non-fatal warning.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), warning);
}

/// Describe where the previous version came from.
pub fn format_source(source: &VersionSource) -> String {
    match source {
        VersionSource::Manifest => "manifest".to_string(),
        VersionSource::GitTag(tag) => format!("git tag '{}'", tag),
    }
}

/// One line per replacement, e.g. `updated src/app.js`.
pub fn format_replacement(report: &ReplacementReport, dry_run: bool) -> String {
    match (report.outcome, dry_run) {
        (ReplacementOutcome::Replaced, false) => format!("updated {}", report.path),
        (ReplacementOutcome::Replaced, true) => format!("would update {}", report.path),
        (ReplacementOutcome::Unmatched, _) => format!("no match in {}", report.path),
    }
}

/// Display the version change.
///
/// Shows the previous version (and its source) and the new version.
pub fn display_version_change(report: &ProcessReport) {
    println!("\n{}", style("Version Change:").bold());
    println!(
        "  From: {} ({})",
        style(report.previous).red(),
        format_source(&report.source)
    );
    println!("  To:   {}", style(report.version).green());
}

/// Display the outcome of each configured replacement.
pub fn display_replacements(report: &ProcessReport) {
    if report.replacements.is_empty() {
        return;
    }

    println!("\n{}", style("Replacements:").underlined());
    for (i, replacement) in report.replacements.iter().enumerate() {
        let line = format_replacement(replacement, report.dry_run);
        match replacement.outcome {
            ReplacementOutcome::Replaced => println!("  {}. {}", i + 1, line),
            ReplacementOutcome::Unmatched => println!("  {}. {}", i + 1, style(line).dim()),
        }
    }
}
