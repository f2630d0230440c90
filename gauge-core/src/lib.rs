#![warn(missing_docs)]
//! Gauge Core - Adaptive Estimator
//!
//! This crate measures workloads:
//! - Picosecond clocks (monotonic or process CPU time)
//! - Global allocator interceptor for allocation/copy accounting
//! - Workload executors that force every result
//! - Trial sampler and the doubling adaptive loop
//! - `Benchmark`, the estimator exposed as a runnable leaf

mod allocator;
mod benchmark;
mod estimator;
mod measure;
mod runnable;
mod sampler;
mod stats;
pub mod workload;

pub use allocator::{TrackingAllocator, allocated_bytes, copied_bytes};
pub use benchmark::{BENCHMARK_OPTIONS, Benchmark};
pub use estimator::{
    DEFAULT_MIN_TRIALS, DEFAULT_TARGET_PRECISION, EstimateError, Estimator, EstimatorConfig,
};
pub use measure::{Clock, ClockKind, CpuClock, MonotonicClock, pin_to_cpu};
pub use runnable::{OptionSpec, Outcome, RunConfig, Runnable};
pub use sampler::TrialSampler;
pub use stats::{AllocSnapshot, NoStats, RuntimeStats, TrackingStats};
pub use workload::Workload;

pub use gauge_report::OutputFormat;
pub use gauge_stats::{Estimate, Measurement};
