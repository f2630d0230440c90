//! Gauge Example Benchmarks
//!
//! This example demonstrates Gauge features and serves as a template for
//! creating your own benchmark suite.
//!
//! Run with:
//!   cargo run --release --example benchmarks                    # Run all benchmarks
//!   cargo run --release --example benchmarks -- --help          # Show all options
//!   cargo run --release --example benchmarks -- list            # List benchmarks
//!   cargo run --release --example benchmarks -- '^collections'  # Run one group
//!   cargo run --release --example benchmarks -- --stdev 1 --timeout 10s
//!   cargo run --release --example benchmarks -- --csv results.csv

use gauge::TrackingAllocator;
use gauge::prelude::*;
use std::collections::HashMap;
use std::hint::black_box;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

// ============================================================================
// Basic Benchmarks
// ============================================================================

fn basics() -> BenchTree {
    bgroup(
        "basics",
        vec![
            bench("addition", iter(|| black_box(42u64) + black_box(17u64))),
            bench("nothing", iter(|| ())),
            bench(
                "fibonacci",
                apply(
                    |n: &u64| (0..*n).fold((0u64, 1u64), |(a, b), _| (b, a.wrapping_add(b))).0,
                    40,
                ),
            ),
        ],
    )
}

// ============================================================================
// Collections (allocation figures shown when the tracking allocator is set)
// ============================================================================

fn collections() -> BenchTree {
    let data: Vec<i64> = (0..1000).collect();

    bgroup(
        "collections",
        vec![
            bench("vec_sum", apply(|d: &Vec<i64>| d.iter().sum::<i64>(), data)),
            bench(
                "vec_push",
                iter(|| {
                    let mut v = Vec::new();
                    for i in 0..100u32 {
                        v.push(i);
                    }
                    v
                }),
            ),
            bench(
                "hashmap_insert",
                iter(|| {
                    let mut map = HashMap::new();
                    for i in 0..100u32 {
                        map.insert(i, i * 2);
                    }
                    map
                }),
            ),
        ],
    )
}

// ============================================================================
// Benchmarks with Input
// ============================================================================

fn sorting() -> BenchTree {
    let sizes = [10usize, 1_000];
    let leaves = sizes
        .into_iter()
        .map(|size| {
            bench(
                size.to_string(),
                iter_with_input(
                    move || (0..size as u64).rev().collect::<Vec<_>>(),
                    |mut v| {
                        v.sort_unstable();
                        v
                    },
                ),
            )
        })
        .collect();

    bgroup("sorting", leaves)
}

// ============================================================================
// Batched and Async Workloads
// ============================================================================

fn batched() -> BenchTree {
    bench(
        "batched_counter",
        from_fn(|n| {
            let mut total = 0u64;
            for i in 0..n {
                total = total.wrapping_add(black_box(i));
            }
            black_box(total);
        }),
    )
}

fn async_group() -> anyhow::Result<BenchTree> {
    Ok(bgroup(
        "async",
        vec![bench(
            "ready_future",
            iter_async(|| async { black_box(7u32) * 6 })?,
        )],
    ))
}

fn main() -> anyhow::Result<()> {
    gauge::run(vec![
        basics(),
        collections(),
        sorting(),
        batched(),
        async_group()?,
    ])
}
