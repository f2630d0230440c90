//! Estimator Leaf
//!
//! Wraps a workload as a [`Runnable`] so the framework can run it like any
//! other leaf.

use crate::estimator::{Estimator, EstimatorConfig};
use crate::measure::Clock;
use crate::runnable::{OptionSpec, Outcome, RunConfig, Runnable};
use crate::stats::{RuntimeStats, TrackingStats};
use crate::workload::Workload;
use gauge_report::{OutputFormat, csv_fields, format_estimate};

/// Options understood by [`Benchmark`]
pub static BENCHMARK_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "stdev",
        help: "Target relative standard deviation, in percent",
    },
    OptionSpec {
        name: "timeout",
        help: "Time budget per benchmark",
    },
    OptionSpec {
        name: "csv",
        help: "Write results to a CSV file instead of the console",
    },
    OptionSpec {
        name: "jobs",
        help: "Parallelism; benchmarks require 1",
    },
    OptionSpec {
        name: "min-trials",
        help: "Trials required before a timeout may produce an estimate",
    },
    OptionSpec {
        name: "clock",
        help: "Timing clock: monotonic or cpu",
    },
];

/// A measured workload
pub struct Benchmark {
    workload: Box<dyn Workload>,
    clock: Option<Box<dyn Clock>>,
    stats: Option<Box<dyn RuntimeStats>>,
}

impl Benchmark {
    /// Measure `workload` with the configured clock and detected accounting
    pub fn new(workload: impl Workload + 'static) -> Self {
        Self {
            workload: Box::new(workload),
            clock: None,
            stats: None,
        }
    }

    /// Time with `clock` instead of the configured one
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Read allocation counters from `stats` instead of probing
    pub fn with_stats(mut self, stats: impl RuntimeStats + 'static) -> Self {
        self.stats = Some(Box::new(stats));
        self
    }
}

impl Runnable for Benchmark {
    fn run(&mut self, config: &RunConfig) -> Outcome {
        if config.jobs > 1 {
            return Outcome::failed(format!(
                "benchmarks must run single-threaded, rerun with -j1 (got -j{})",
                config.jobs
            ));
        }

        let built_clock;
        let clock: &dyn Clock = match &self.clock {
            Some(clock) => clock.as_ref(),
            None => match config.clock.build() {
                Some(clock) => {
                    built_clock = clock;
                    built_clock.as_ref()
                }
                None => {
                    return Outcome::failed(format!(
                        "{:?} clock is not available on this platform",
                        config.clock
                    ));
                }
            },
        };

        let detected;
        let stats: &dyn RuntimeStats = match &self.stats {
            Some(stats) => stats.as_ref(),
            None => {
                detected = TrackingStats::detect();
                &detected
            }
        };

        let estimator = Estimator::new(
            clock,
            stats,
            EstimatorConfig {
                target_precision: config.target_precision,
                timeout_ps: config.timeout_ps(),
                min_trials: config.min_trials,
            },
        );
        let accounting = estimator.accounting();

        match estimator.estimate(self.workload.as_mut()) {
            Ok(estimate) => {
                let summary = match config.format {
                    OutputFormat::Human => format_estimate(&estimate, accounting),
                    OutputFormat::Csv => csv_fields(&estimate, accounting),
                };
                Outcome::Passed {
                    estimate,
                    accounting,
                    summary,
                }
            }
            Err(e) => Outcome::failed(e.to_string()),
        }
    }

    fn options(&self) -> &'static [OptionSpec] {
        BENCHMARK_OPTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{AllocSnapshot, NoStats};
    use crate::workload::from_fn;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeClock {
        now: Rc<Cell<i64>>,
    }

    impl Clock for FakeClock {
        fn now_ps(&self) -> i64 {
            self.now.get()
        }

        fn precision_ps(&self) -> i64 {
            1
        }
    }

    /// Counters that grow by a fixed amount per iteration of the workload
    #[derive(Clone, Default)]
    struct FakeStats {
        allocated: Rc<Cell<u64>>,
    }

    impl RuntimeStats for FakeStats {
        fn is_enabled(&self) -> bool {
            true
        }

        fn snapshot(&self) -> AllocSnapshot {
            AllocSnapshot {
                allocated: self.allocated.get(),
                copied: 0,
            }
        }
    }

    fn constant_benchmark(cost_ps: i64, runs: Rc<Cell<u64>>) -> Benchmark {
        let clock = FakeClock::default();
        let tick = clock.clone();
        Benchmark::new(from_fn(move |n| {
            runs.set(runs.get() + 1);
            tick.now.set(tick.now.get() + cost_ps * n as i64);
        }))
        .with_clock(clock)
        .with_stats(NoStats)
    }

    #[test]
    fn test_refuses_parallel_jobs() {
        let runs = Rc::new(Cell::new(0));
        let mut bench = constant_benchmark(100_000, runs.clone());
        let outcome = bench.run(&RunConfig {
            jobs: 4,
            ..Default::default()
        });

        match outcome {
            Outcome::Failed { reason } => assert!(reason.contains("-j1"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_human_summary() {
        let runs = Rc::new(Cell::new(0));
        let mut bench = constant_benchmark(100_000, runs.clone());
        let outcome = bench.run(&RunConfig::default());

        let Outcome::Passed {
            estimate,
            accounting,
            summary,
        } = outcome
        else {
            panic!("expected an estimate");
        };
        assert_eq!(estimate.mean.time, 100_000);
        assert!(!accounting);
        assert!(summary.starts_with("100 ns ± "), "{summary}");
        assert!(runs.get() > 2);
    }

    #[test]
    fn test_csv_summary_with_accounting() {
        let clock = FakeClock::default();
        let stats = FakeStats::default();
        let (tick, counter) = (clock.clone(), stats.clone());
        let mut bench = Benchmark::new(from_fn(move |n| {
            tick.now.set(tick.now.get() + 100_000 * n as i64);
            counter.allocated.set(counter.allocated.get() + 48 * n);
        }))
        .with_clock(clock)
        .with_stats(stats);

        let outcome = bench.run(&RunConfig {
            format: OutputFormat::Csv,
            ..Default::default()
        });

        let Outcome::Passed {
            estimate,
            accounting,
            summary,
        } = outcome
        else {
            panic!("expected an estimate");
        };
        assert!(accounting);
        assert_eq!(estimate.mean.allocated, 48);
        assert_eq!(summary, format!("100000,{},48,0", estimate.sigma));
    }

    #[test]
    fn test_insufficient_time_is_a_failure() {
        let runs = Rc::new(Cell::new(0));
        let mut bench = constant_benchmark(5_000_000_000_000, runs.clone());
        let outcome = bench.run(&RunConfig {
            timeout: Some(std::time::Duration::from_secs(1)),
            ..Default::default()
        });

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_declares_options() {
        let bench = Benchmark::new(from_fn(|_| {}));
        let names: Vec<_> = bench.options().iter().map(|o| o.name).collect();
        assert_eq!(names, ["stdev", "timeout", "csv", "jobs", "min-trials", "clock"]);
    }
}
