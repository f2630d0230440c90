//! Measurement Model
//!
//! Integer-exact records for trial outcomes. All fields are additive and
//! scale linearly with the iteration count, so a total over `n` iterations
//! becomes a per-iteration value by truncating division.

/// Outcome of running a workload for some iteration count, or a derived
/// per-iteration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    /// Elapsed time in picoseconds
    pub time: i64,
    /// Bytes allocated (0 when accounting is unavailable)
    pub allocated: i64,
    /// Bytes copied by relocating reallocations (0 when unavailable)
    pub copied: i64,
}

impl Measurement {
    /// The empty measurement
    pub const ZERO: Self = Self {
        time: 0,
        allocated: 0,
        copied: 0,
    };

    /// Create a measurement from raw totals
    #[inline]
    pub const fn new(time: i64, allocated: i64, copied: i64) -> Self {
        Self {
            time,
            allocated,
            copied,
        }
    }

    /// Timing-only measurement (accounting unavailable)
    #[inline]
    pub const fn timing_only(time: i64) -> Self {
        Self::new(time, 0, 0)
    }

    /// Divide every field by `n`, truncating toward zero.
    ///
    /// `n == 0` leaves the measurement untouched.
    #[inline]
    pub fn scale_down(self, n: u64) -> Self {
        if n == 0 {
            return self;
        }
        Self {
            time: div_i64(self.time, n),
            allocated: div_i64(self.allocated, n),
            copied: div_i64(self.copied, n),
        }
    }

    /// Shift the time component, leaving byte counters alone.
    #[inline]
    pub fn with_time_offset(self, delta: i64) -> Self {
        Self {
            time: self.time.saturating_add(delta),
            ..self
        }
    }
}

/// Mean and deviation figure produced by the two-point fit.
///
/// Until the adaptive loop terminates both parts refer to totals for the
/// current iteration count; [`Estimate::scale_down`] turns them into
/// per-iteration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Estimate {
    /// Fitted mean
    pub mean: Measurement,
    /// Square root of the residual sum of squares, in picoseconds
    pub sigma: i64,
}

impl Estimate {
    /// Create an estimate
    #[inline]
    pub const fn new(mean: Measurement, sigma: i64) -> Self {
        Self { mean, sigma }
    }

    /// Divide mean and sigma by `n` (truncating).
    #[inline]
    pub fn scale_down(self, n: u64) -> Self {
        if n == 0 {
            return self;
        }
        Self {
            mean: self.mean.scale_down(n),
            sigma: div_i64(self.sigma, n),
        }
    }

    /// Sigma relative to the mean time, or `None` for a non-positive mean
    pub fn relative_sigma(&self) -> Option<f64> {
        (self.mean.time > 0).then(|| self.sigma as f64 / self.mean.time as f64)
    }
}

#[inline]
fn div_i64(value: i64, n: u64) -> i64 {
    // n > i64::MAX only happens for absurd iteration counts; the quotient truncates to 0 then
    (value as i128 / n as i128) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_down_truncates() {
        let m = Measurement::new(1_001, 17, 5);
        assert_eq!(m.scale_down(2), Measurement::new(500, 8, 2));
        assert_eq!(m.scale_down(1), m);
    }

    #[test]
    fn test_scale_down_rounds_toward_zero() {
        let m = Measurement::timing_only(-7);
        assert_eq!(m.scale_down(2).time, -3);
    }

    #[test]
    fn test_scale_down_zero_is_identity() {
        let m = Measurement::new(9, 9, 9);
        assert_eq!(m.scale_down(0), m);
    }

    #[test]
    fn test_time_offset_keeps_bytes() {
        let m = Measurement::new(100, 64, 32).with_time_offset(-150);
        assert_eq!(m, Measurement::new(-50, 64, 32));
    }

    #[test]
    fn test_estimate_scale_down() {
        let est = Estimate::new(Measurement::new(4_000, 400, 40), 200);
        let scaled = est.scale_down(4);
        assert_eq!(scaled.mean, Measurement::new(1_000, 100, 10));
        assert_eq!(scaled.sigma, 50);
    }

    #[test]
    fn test_relative_sigma() {
        let est = Estimate::new(Measurement::timing_only(1_000), 50);
        assert!((est.relative_sigma().unwrap() - 0.05).abs() < f64::EPSILON);
        assert!(Estimate::default().relative_sigma().is_none());
    }
}
