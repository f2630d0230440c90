//! Runnable Leaves
//!
//! The interface between the test-running framework and anything it can
//! execute as a named leaf.

use crate::estimator::{DEFAULT_MIN_TRIALS, DEFAULT_TARGET_PRECISION};
use crate::measure::ClockKind;
use gauge_report::OutputFormat;
use gauge_stats::Estimate;
use std::time::Duration;

/// Resolved settings handed to every leaf
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Relative deviation target as a fraction of the mean
    pub target_precision: f64,
    /// Time budget per benchmark
    pub timeout: Option<Duration>,
    /// How the result summary is rendered
    pub format: OutputFormat,
    /// Requested parallelism
    pub jobs: usize,
    /// Trials required before a timeout may yield an estimate
    pub min_trials: u32,
    /// Clock used for timing
    pub clock: ClockKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_precision: DEFAULT_TARGET_PRECISION,
            timeout: None,
            format: OutputFormat::Human,
            jobs: 1,
            min_trials: DEFAULT_MIN_TRIALS,
            clock: ClockKind::default(),
        }
    }
}

impl RunConfig {
    /// Timeout in picoseconds, saturating at `i64::MAX`
    pub fn timeout_ps(&self) -> Option<i64> {
        self.timeout.map(|t| {
            let ps = t.as_nanos().saturating_mul(1_000);
            i64::try_from(ps).unwrap_or(i64::MAX)
        })
    }
}

/// Result of running one leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An estimate was produced
    Passed {
        /// Per-iteration estimate
        estimate: Estimate,
        /// Whether byte counts are meaningful
        accounting: bool,
        /// Human string or CSV numeric fields, per the configured format
        summary: String,
    },
    /// No estimate; the reason is shown to the user
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl Outcome {
    /// Shorthand for a failure
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed {
            reason: reason.into(),
        }
    }

    /// Whether an estimate was produced
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed { .. })
    }
}

/// A configuration option a leaf understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as spelled on the command line
    pub name: &'static str,
    /// One-line description
    pub help: &'static str,
}

/// Something the framework can run as a leaf.
pub trait Runnable {
    /// Execute with the resolved configuration
    fn run(&mut self, config: &RunConfig) -> Outcome;

    /// Options this leaf recognizes
    fn options(&self) -> &'static [OptionSpec];
}
