//! Trial Sampler
//!
//! One trial: settle the runtime, read the counters and the clock, run the
//! workload `n` times, then read the clock and the counters again.

use crate::measure::Clock;
use crate::stats::RuntimeStats;
use crate::workload::Workload;
use gauge_stats::Measurement;

/// Runs trials against an injected clock and statistics source
pub struct TrialSampler<'a> {
    clock: &'a dyn Clock,
    stats: &'a dyn RuntimeStats,
}

impl<'a> TrialSampler<'a> {
    /// Create a sampler
    pub fn new(clock: &'a dyn Clock, stats: &'a dyn RuntimeStats) -> Self {
        Self { clock, stats }
    }

    /// Clock resolution in picoseconds
    pub fn clock_precision_ps(&self) -> i64 {
        self.clock.precision_ps()
    }

    /// Whether byte counters are being reported
    pub fn accounting(&self) -> bool {
        self.stats.is_enabled()
    }

    /// Run `workload` for `n` iterations and return the totals.
    ///
    /// Blocks for the full duration of the trial.
    pub fn sample(&self, workload: &mut dyn Workload, n: u64) -> Measurement {
        let accounting = self.stats.is_enabled();

        self.stats.settle();
        let start_stats = accounting.then(|| self.stats.snapshot());
        let start = self.clock.now_ps();

        workload.exec(n);

        let time = self.clock.now_ps().saturating_sub(start);
        match start_stats {
            Some(start_stats) => {
                let (allocated, copied) = self.stats.snapshot().since(&start_stats);
                Measurement::new(time, allocated, copied)
            }
            None => Measurement {
                time,
                ..Measurement::ZERO
            },
        }
    }
}
