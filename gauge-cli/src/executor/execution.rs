//! Benchmark Execution
//!
//! Runs planned leaves strictly one after another on the calling thread.
//! Each leaf runs under `catch_unwind`, so a panicking benchmark is reported
//! as crashed and its siblings still run. With a CSV sink attached, each
//! estimate is written and flushed as soon as its leaf completes.
//!
//! ## Data Flow
//!
//! ```text
//! PlannedBenchmark (from planner)
//!        │
//!        ▼
//!    RunConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │     Executor     │  Runnable::run → Outcome (or panic)
//! └────────┬─────────┘
//!          │
//!          ├──▶ CsvSink row (passed leaves)
//!          ▼
//!  BenchmarkReportResult (status, estimate, summary, failure)
//! ```

use crate::planner::PlannedBenchmark;
use gauge_core::{Outcome, RunConfig};
use gauge_report::{BenchmarkReportResult, BenchmarkStatus, CsvSink, ReportError};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;

/// Execute benchmarks and produce results (in-process, sequential)
pub struct Executor {
    config: RunConfig,
    csv: Option<CsvSink>,
    progress: bool,
}

impl Executor {
    /// Create an executor handing `config` to every leaf
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            csv: None,
            progress: true,
        }
    }

    /// Stream estimates into `sink` as leaves complete
    pub fn with_csv(mut self, sink: CsvSink) -> Self {
        self.csv = Some(sink);
        self
    }

    /// Show or hide the progress bar
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Whether the progress bar is drawn
    pub fn shows_progress(&self) -> bool {
        self.progress
    }

    /// Execute all provided benchmarks
    ///
    /// Only a failure to write the CSV file aborts the run.
    pub fn execute(
        &mut self,
        benchmarks: Vec<PlannedBenchmark<'_>>,
    ) -> Result<Vec<BenchmarkReportResult>, ReportError> {
        let pb = if self.progress {
            ProgressBar::new(benchmarks.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(benchmarks.len());
        for mut bench in benchmarks {
            pb.set_message(bench.path.clone());
            let result = self.execute_single(&mut bench);

            if let (Some(sink), Some(estimate)) = (self.csv.as_mut(), result.estimate.as_ref()) {
                sink.write_row(&result.name, estimate)?;
            }

            results.push(result);
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(results)
    }

    /// Execute a single benchmark
    fn execute_single(&self, bench: &mut PlannedBenchmark<'_>) -> BenchmarkReportResult {
        let start = Instant::now();
        tracing::debug!(path = %bench.path, "running benchmark");

        // Run with panic catching
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bench.runnable.run(&self.config)
        }));

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        let name = bench.path.clone();

        match outcome {
            Ok(Outcome::Passed {
                estimate, summary, ..
            }) => BenchmarkReportResult {
                name,
                status: BenchmarkStatus::Passed,
                estimate: Some(estimate),
                summary: Some(summary),
                failure: None,
                duration_ms,
            },
            Ok(Outcome::Failed { reason }) => {
                tracing::debug!(path = %bench.path, %reason, "benchmark failed");
                BenchmarkReportResult {
                    name,
                    status: BenchmarkStatus::Failed,
                    estimate: None,
                    summary: None,
                    failure: Some(reason),
                    duration_ms,
                }
            }
            Err(panic) => {
                let message = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                BenchmarkReportResult {
                    name,
                    status: BenchmarkStatus::Crashed,
                    estimate: None,
                    summary: None,
                    failure: Some(format!("panicked: {message}")),
                    duration_ms,
                }
            }
        }
    }
}
