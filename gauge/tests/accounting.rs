//! Allocation accounting with the tracking allocator installed
//!
//! Kept in its own test binary: the counters are process-wide, so a single
//! test keeps other threads from allocating during the measurement.

use gauge::prelude::*;
use gauge::{
    Clock, OutputFormat, RunConfig, Runnable, RuntimeStats, TrackingAllocator, TrackingStats,
    allocated_bytes, copied_bytes,
};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

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

#[test]
fn test_allocations_counted_per_iteration() {
    assert!(TrackingStats::detect().is_enabled());

    // Growing a Vec past its capacity moves or grows it; either way bytes are counted
    let before = (allocated_bytes(), copied_bytes());
    let mut v: Vec<u8> = Vec::with_capacity(16);
    v.extend_from_slice(&[1; 16]);
    v.reserve(4096);
    black_box(&v);
    assert!(allocated_bytes() - before.0 >= 16 + 4096 - 16);
    assert!(copied_bytes() >= before.1);
    drop(v);

    let clock = FakeClock::default();
    let tick = clock.clone();
    let mut bench = Benchmark::new(from_fn(move |n| {
        for _ in 0..n {
            black_box(vec![0u8; 64]);
        }
        tick.now.set(tick.now.get() + 100_000 * n as i64);
    }))
    .with_clock(clock);

    let outcome = bench.run(&RunConfig {
        format: OutputFormat::Csv,
        ..Default::default()
    });

    let gauge::Outcome::Passed {
        estimate,
        accounting,
        summary,
    } = outcome
    else {
        panic!("expected an estimate");
    };
    assert!(accounting);
    assert_eq!(estimate.mean.time, 100_000);
    assert!(estimate.mean.allocated >= 64, "{estimate:?}");
    assert!(summary.starts_with("100000,"), "{summary}");
    assert_eq!(summary.split(',').count(), 4);
}
