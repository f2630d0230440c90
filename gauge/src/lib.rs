#![warn(missing_docs)]
//! # Gauge
//!
//! Adaptive benchmarking for Rust: each benchmark runs for as long as it
//! takes to reach a target precision, and no longer.
//!
//! - **Adaptive Trials**: iteration counts double until a two-point least
//!   squares fit of time against iterations is precise enough
//! - **Honest Error Bars**: clock resolution is folded into the reported
//!   standard deviation, so nothing is claimed below what the clock can see
//! - **Allocation Accounting**: `TrackingAllocator` counts bytes allocated and
//!   copied by reallocation, per iteration
//! - **Time Budgets**: a benchmark stops early when its next trial would
//!   overrun `--timeout`
//! - **Crash Isolation**: a panicking benchmark is reported, the rest still run
//! - **CSV Output**: one row per benchmark, streamed as results arrive
//!
//! ## Quick Start
//!
//! ```no_run
//! use gauge::prelude::*;
//! use std::hint::black_box;
//!
//! fn main() -> anyhow::Result<()> {
//!     gauge::run(vec![
//!         bench("add", iter(|| black_box(2u64) + black_box(3))),
//!         bgroup(
//!             "vec",
//!             vec![bench("collect", apply(|n: &u64| (0..*n).collect::<Vec<_>>(), 1_000))],
//!         ),
//!     ])
//! }
//! ```
//!
//! ## Allocation Accounting
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: gauge::TrackingAllocator = gauge::TrackingAllocator;
//! ```

// Re-export core types
pub use gauge_core::{
    BENCHMARK_OPTIONS, Benchmark, Clock, ClockKind, CpuClock, EstimateError, Estimator,
    EstimatorConfig, MonotonicClock, NoStats, OptionSpec, Outcome, RunConfig, Runnable,
    RuntimeStats, TrackingAllocator, TrackingStats, Workload, allocated_bytes, copied_bytes,
    workload,
};

// Re-export framework types
pub use gauge_cli::{BenchTree, Cli, GaugeConfig, bench, bench_with, bgroup, run_with_cli};

// Re-export report and stats types
pub use gauge_report::{
    BenchmarkReportResult, BenchmarkStatus, OutputFormat, Report, format_bytes, format_estimate,
    format_time,
};
pub use gauge_stats::{Estimate, Measurement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::workload::{apply, from_fn, iter, iter_async, iter_with_input};
    pub use crate::{BenchTree, Benchmark, bench, bench_with, bgroup};
}

/// Run the Gauge CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     gauge::run(suite())
/// }
/// ```
pub use gauge_cli::run;
