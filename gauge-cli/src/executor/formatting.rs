//! Output Formatting
//!
//! Human-readable output formatting for benchmark reports.
//!
//! Generates terminal-friendly output with:
//! - One line per benchmark with a status icon (✓/✗/💥)
//! - The leaf's own summary (`mean ± 2σ`, allocation figures)
//! - Failure messages for failed and crashed benchmarks
//! - Wall time spent on each benchmark
//! - Run summary with counts and duration

use gauge_report::{BenchmarkStatus, Report};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Gauge Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let width = report
        .results
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0);

    for result in &report.results {
        let status_icon = match result.status {
            BenchmarkStatus::Passed => "✓",
            BenchmarkStatus::Failed => "✗",
            BenchmarkStatus::Crashed => "💥",
        };

        let detail = match (&result.summary, &result.failure) {
            (Some(summary), _) => summary.clone(),
            (None, Some(failure)) => format!("error: {failure}"),
            (None, None) => String::new(),
        };

        output.push_str(&format!(
            "  {} {:<width$}  {}  ({:.2} ms)\n",
            status_icon, result.name, detail, result.duration_ms
        ));
    }

    // Summary
    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Passed: {}  Failed: {}  Crashed: {}\n",
        report.summary.total_benchmarks,
        report.summary.passed,
        report.summary.failed,
        report.summary.crashed
    ));
    if !report.accounting {
        output.push_str("  Allocation accounting: unavailable\n");
    }
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}
