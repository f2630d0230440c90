//! Two-Point Regression
//!
//! Fits a per-iteration cost to two trials taken at `n` and `2n` iterations.
//!
//! With observed totals `t1` (at `n`) and `t2` (at `2n`), the least-squares
//! solution for the total cost at `n` iterations is `(t1 + 2*t2) / 5`. The
//! deviation figure is the root of the residual sum of squares. It is a noise
//! proxy, not a classical standard deviation.

use crate::measurement::{Estimate, Measurement};

/// Lower bound on the clock precision used for perturbation (1 ms in picoseconds)
pub const MIN_CLOCK_PRECISION_PS: i64 = 1_000_000_000;

/// Fit two trials, the second taken with twice the iterations of the first.
///
/// Each of time, allocated and copied bytes is fitted independently with
/// truncating integer division. The result is still a total for `n`
/// iterations.
pub fn predict(t1: Measurement, t2: Measurement) -> Estimate {
    let time = fit(t1.time, t2.time);

    let r1 = t1.time as f64 - time as f64;
    let r2 = t2.time as f64 - 2.0 * time as f64;
    // `as` saturates on overflow and truncates toward zero
    let sigma = (r1 * r1 + r2 * r2).sqrt() as i64;

    Estimate {
        mean: Measurement {
            time,
            allocated: fit(t1.allocated, t2.allocated),
            copied: fit(t1.copied, t2.copied),
        },
        sigma,
    }
}

/// Fit two trials and widen the deviation by the clock precision.
///
/// The time of each trial is moved by `±max(clock_precision_ps, 1 ms)`; sigma
/// is the largest of the four perturbed fits, the mean comes from the plain
/// fit. A coarse clock can otherwise make two trials agree perfectly through
/// quantization alone.
pub fn predict_perturbed(t1: Measurement, t2: Measurement, clock_precision_ps: i64) -> Estimate {
    let precision = clock_precision_ps.max(MIN_CLOCK_PRECISION_PS);
    let plain = predict(t1, t2);

    let sigma = [(-1, -1), (-1, 1), (1, -1), (1, 1)]
        .into_iter()
        .map(|(s1, s2): (i64, i64)| {
            predict(
                t1.with_time_offset(s1.saturating_mul(precision)),
                t2.with_time_offset(s2.saturating_mul(precision)),
            )
            .sigma
        })
        .fold(plain.sigma, i64::max);

    Estimate {
        mean: plain.mean,
        sigma,
    }
}

#[inline]
fn fit(x1: i64, x2: i64) -> i64 {
    saturate((x1 as i128 + 2 * x2 as i128) / 5)
}

#[inline]
fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
