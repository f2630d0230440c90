//! Report Data Structures

use gauge_stats::Estimate;

/// Complete run report
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Per-benchmark results in execution order
    pub results: Vec<BenchmarkReportResult>,
    /// Whether allocation accounting was available for this run
    pub accounting: bool,
    /// Aggregated counts
    pub summary: ReportSummary,
}

impl Report {
    /// Build a report, tallying the summary from `results`
    pub fn new(results: Vec<BenchmarkReportResult>, accounting: bool, total_duration_ms: f64) -> Self {
        let mut summary = ReportSummary {
            total_benchmarks: results.len(),
            total_duration_ms,
            ..Default::default()
        };
        for result in &results {
            match result.status {
                BenchmarkStatus::Passed => summary.passed += 1,
                BenchmarkStatus::Failed => summary.failed += 1,
                BenchmarkStatus::Crashed => summary.crashed += 1,
            }
        }
        Self {
            results,
            accounting,
            summary,
        }
    }

    /// Whether any benchmark failed or crashed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || self.summary.crashed > 0
    }
}

/// Individual benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkReportResult {
    /// Dotted path of the benchmark
    pub name: String,
    /// Final status
    pub status: BenchmarkStatus,
    /// Per-iteration estimate, present when passed
    pub estimate: Option<Estimate>,
    /// Rendered description returned by the benchmark
    pub summary: Option<String>,
    /// Failure message for failed or crashed benchmarks
    pub failure: Option<String>,
    /// Wall time spent on this benchmark
    pub duration_ms: f64,
}

/// Benchmark execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkStatus {
    /// An estimate was produced
    Passed,
    /// The benchmark reported a failure
    Failed,
    /// The benchmark panicked
    Crashed,
}

/// Report summary
#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    /// Number of benchmarks run
    pub total_benchmarks: usize,
    /// Benchmarks with an estimate
    pub passed: usize,
    /// Benchmarks reporting a failure
    pub failed: usize,
    /// Benchmarks that panicked
    pub crashed: usize,
    /// Wall time for the whole run
    pub total_duration_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, status: BenchmarkStatus) -> BenchmarkReportResult {
        BenchmarkReportResult {
            name: name.to_string(),
            status,
            estimate: None,
            summary: None,
            failure: None,
            duration_ms: 0.0,
        }
    }

    #[test]
    fn test_summary_counts() {
        let report = Report::new(
            vec![
                result("a", BenchmarkStatus::Passed),
                result("b", BenchmarkStatus::Failed),
                result("c", BenchmarkStatus::Passed),
                result("d", BenchmarkStatus::Crashed),
            ],
            false,
            12.5,
        );
        assert_eq!(report.summary.total_benchmarks, 4);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.crashed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn test_all_passed() {
        let report = Report::new(vec![result("a", BenchmarkStatus::Passed)], true, 1.0);
        assert!(!report.has_failures());
        assert!(report.accounting);
    }
}
