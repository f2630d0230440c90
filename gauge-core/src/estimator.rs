//! Adaptive Loop
//!
//! Samples at `n = 1`, then keeps doubling `n`, fitting each consecutive
//! pair of trials until the deviation figure drops below the target
//! fraction of the mean or the next doubling is projected to cross the
//! timeout horizon. The result is divided by `n` exactly once, on exit.

use crate::measure::Clock;
use crate::sampler::TrialSampler;
use crate::stats::RuntimeStats;
use crate::workload::Workload;
use gauge_stats::{Estimate, Measurement, predict_perturbed, timeout_imminent, within_precision};
use thiserror::Error;
use tracing::{debug, warn};

/// Trials that must complete before a timeout may yield an estimate
pub const DEFAULT_MIN_TRIALS: u32 = 2;

/// Default relative deviation target (5%)
pub const DEFAULT_TARGET_PRECISION: f64 = 0.05;

/// Adaptive loop settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Relative deviation target as a fraction of the mean
    pub target_precision: f64,
    /// Time budget in picoseconds, unbounded when `None`
    pub timeout_ps: Option<i64>,
    /// Trials required before a timeout stop produces an estimate.
    /// Values below two behave as two, since the first fit needs a pair.
    pub min_trials: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            target_precision: DEFAULT_TARGET_PRECISION,
            timeout_ps: None,
            min_trials: DEFAULT_MIN_TRIALS,
        }
    }
}

/// Why no estimate could be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// The horizon was used up before enough trials completed
    #[error(
        "timeout of {horizon_ps} ps exhausted after {trials} trial(s) ({elapsed_ps} ps); not enough time to estimate"
    )]
    InsufficientTime {
        /// Trials completed
        trials: u32,
        /// Time spent in trials so far
        elapsed_ps: i64,
        /// Configured horizon
        horizon_ps: i64,
    },

    /// The precision target is not a positive finite fraction
    #[error("target precision must be positive and finite, got {0}")]
    InvalidPrecision(f64),
}

/// Drives the trial sampler until a stopping criterion holds
pub struct Estimator<'a> {
    sampler: TrialSampler<'a>,
    config: EstimatorConfig,
}

impl<'a> Estimator<'a> {
    /// Create an estimator over an injected clock and statistics source
    pub fn new(clock: &'a dyn Clock, stats: &'a dyn RuntimeStats, config: EstimatorConfig) -> Self {
        Self {
            sampler: TrialSampler::new(clock, stats),
            config,
        }
    }

    /// Whether the estimates carry byte counts
    pub fn accounting(&self) -> bool {
        self.sampler.accounting()
    }

    /// Run the adaptive loop and return a per-iteration estimate.
    pub fn estimate(&self, workload: &mut dyn Workload) -> Result<Estimate, EstimateError> {
        let target = self.config.target_precision;
        if !(target.is_finite() && target > 0.0) {
            return Err(EstimateError::InvalidPrecision(target));
        }
        let min_trials = self.config.min_trials.max(2);
        let precision_ps = self.sampler.clock_precision_ps();

        let mut n: u64 = 1;
        let mut prev = self.trial(workload, n);
        let mut elapsed: i64 = 0;
        let mut trials: u32 = 1;
        self.check_budget(trials, prev.time, min_trials)?;

        loop {
            let current = self.trial(workload, 2 * n);
            trials = trials.saturating_add(1);
            let spent = elapsed.saturating_add(prev.time).saturating_add(current.time);
            self.check_budget(trials, spent, min_trials)?;
            let estimate = predict_perturbed(prev, current, precision_ps);

            if within_precision(&estimate, target) {
                debug!(n, trials, sigma_ps = estimate.sigma, "precision target met");
                return Ok(estimate.scale_down(n));
            }

            if let Some(horizon_ps) = self.config.timeout_ps {
                if trials >= min_trials && timeout_imminent(elapsed, &prev, &current, horizon_ps) {
                    warn!(
                        n,
                        trials,
                        target,
                        achieved = estimate.relative_sigma().unwrap_or(f64::INFINITY),
                        "timeout reached before precision target"
                    );
                    return Ok(estimate.scale_down(n));
                }
            }

            if n > u64::MAX / 4 {
                warn!(n, "iteration count cannot double further");
                return Ok(estimate.scale_down(n));
            }

            elapsed = elapsed.saturating_add(prev.time);
            prev = current;
            n *= 2;
        }
    }

    fn trial(&self, workload: &mut dyn Workload, n: u64) -> Measurement {
        let m = self.sampler.sample(workload, n);
        debug!(n, time_ps = m.time, allocated = m.allocated, copied = m.copied, "trial");
        m
    }

    /// Fail once the horizon is spent by the time `min_trials` trials have run.
    /// The trial that reaches `min_trials` only counts if it ended inside the horizon.
    fn check_budget(&self, trials: u32, spent_ps: i64, min_trials: u32) -> Result<(), EstimateError> {
        match self.config.timeout_ps {
            Some(horizon_ps) if trials <= min_trials && spent_ps >= horizon_ps => {
                Err(EstimateError::InsufficientTime {
                    trials,
                    elapsed_ps: spent_ps,
                    horizon_ps,
                })
            }
            _ => Ok(()),
        }
    }
}
