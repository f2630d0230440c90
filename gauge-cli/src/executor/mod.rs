//! Benchmark Executor
//!
//! Runs planned benchmarks in-process, one at a time, and renders the
//! collected results.
//!
//! ## Pipeline Overview
//!
//! ```text
//! BenchTree (declared suite)
//!       │
//!       ▼
//! ┌─────────────┐
//! │   planner   │  Flatten, filter by dotted path
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Run leaves sequentially, stream CSV rows
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential leaf execution with panic isolation
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;

pub use execution::Executor;
pub use formatting::format_human_output;
