//! Stopping Criteria
//!
//! Both checks operate on totals for the current iteration count, before
//! anything is divided by `n`.

use crate::measurement::{Estimate, Measurement};

/// Whether the deviation is below `target` times the mean time.
///
/// Negative or NaN targets are treated as zero, which never passes.
pub fn within_precision(estimate: &Estimate, target: f64) -> bool {
    let bound = (target.max(0.0) * estimate.mean.time as f64) as i64;
    estimate.sigma < bound
}

/// Whether the next doubling would run into the timeout horizon.
///
/// Projects the elapsed time after one more trial: the trials so far
/// (`elapsed + t1 + t2`) plus a next trial of roughly `2 * t2`, inflated by
/// a 20% margin.
pub fn timeout_imminent(elapsed_ps: i64, t1: &Measurement, t2: &Measurement, horizon_ps: i64) -> bool {
    let projected = elapsed_ps as i128 + t1.time as i128 + 3 * t2.time as i128;
    projected * 12 >= horizon_ps as i128 * 10
}
