#![warn(missing_docs)]
//! Gauge Statistical Engine
//!
//! Integer-exact measurement model and the arithmetic of the adaptive
//! estimator:
//! - `Measurement` / `Estimate` records in picoseconds and bytes
//! - Two-point least-squares fit over trials at `n` and `2n` iterations
//! - Clock-precision perturbation of the deviation figure
//! - Precision and timeout stopping criteria

mod measurement;
mod regression;
mod stopping;

pub use measurement::{Estimate, Measurement};
pub use regression::{MIN_CLOCK_PRECISION_PS, predict, predict_perturbed};
pub use stopping::{timeout_imminent, within_precision};

/// Picoseconds per nanosecond
pub const PS_PER_NS: i64 = 1_000;

/// Picoseconds per second
pub const PS_PER_SEC: i64 = 1_000_000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(PS_PER_SEC / PS_PER_NS, 1_000_000_000);
        assert_eq!(MIN_CLOCK_PRECISION_PS, PS_PER_SEC / 1_000);
    }
}
