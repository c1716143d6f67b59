//! Colored console rendering of a diagnostic run report.

use colored::Colorize;
use preflight_types::{RunReport, Severity};

fn tag(severity: Severity) -> String {
    let tag = severity.tag();
    match severity {
        Severity::Ok => tag.green().bold().to_string(),
        Severity::Warn => tag.yellow().bold().to_string(),
        Severity::Fail => tag.red().bold().to_string(),
    }
}

/// Print the per-check lines, the warnings block, and the final summary
/// line in the order deployment operators expect.
pub fn print_report(report: &RunReport) {
    for record in &report.checks {
        println!("{} {}", tag(record.severity), record.message);
    }

    let summary = &report.summary;
    if !summary.warnings.is_empty() {
        println!("{} {} warning(s):", tag(Severity::Warn), summary.warnings.len());
        for item in &summary.warnings {
            println!("       - {item}");
        }
    }

    if summary.failures.is_empty() {
        println!(
            "{} Hardware test completed. Warnings={}",
            tag(Severity::Ok),
            summary.warnings.len()
        );
    } else {
        println!(
            "{} Hardware test failed with {} error(s).",
            tag(Severity::Fail),
            summary.failures.len()
        );
    }
}
