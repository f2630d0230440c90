//! Clocks
//!
//! Picosecond readings from the monotonic wall clock (default) or the
//! process CPU-time clock, each reporting its own resolution so the
//! estimator can perturb trials by it.

use std::time::Instant;

/// Picoseconds per nanosecond
const PS_PER_NS: i64 = 1_000;

/// Source of picosecond timestamps.
pub trait Clock {
    /// Current reading in picoseconds from an arbitrary origin
    fn now_ps(&self) -> i64;

    /// Resolution of the clock in picoseconds
    fn precision_ps(&self) -> i64;
}

/// Which clock a benchmark is timed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockKind {
    /// Monotonic wall clock
    #[default]
    Monotonic,
    /// CPU time consumed by the whole process
    Cpu,
}

impl std::str::FromStr for ClockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monotonic" | "wall" => Ok(ClockKind::Monotonic),
            "cpu" => Ok(ClockKind::Cpu),
            other => Err(format!("Unknown clock: {}", other)),
        }
    }
}

impl ClockKind {
    /// Build the clock, or `None` when it is unsupported on this platform
    pub fn build(self) -> Option<Box<dyn Clock>> {
        match self {
            ClockKind::Monotonic => Some(Box::new(MonotonicClock::new())),
            ClockKind::Cpu => CpuClock::new().map(|c| Box::new(c) as Box<dyn Clock>),
        }
    }
}

// ─── Monotonic ───────────────────────────────────────────────────────────────

/// Wall clock backed by [`std::time::Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
    precision_ps: i64,
}

impl MonotonicClock {
    /// Start a clock with its origin at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            precision_ps: monotonic_resolution_ps(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now_ps(&self) -> i64 {
        let nanos = self.origin.elapsed().as_nanos();
        i64::try_from(nanos.saturating_mul(PS_PER_NS as u128)).unwrap_or(i64::MAX)
    }

    fn precision_ps(&self) -> i64 {
        self.precision_ps
    }
}

#[cfg(unix)]
fn monotonic_resolution_ps() -> i64 {
    clock_resolution_ps(libc::CLOCK_MONOTONIC).unwrap_or(PS_PER_NS)
}

#[cfg(not(unix))]
fn monotonic_resolution_ps() -> i64 {
    PS_PER_NS
}

// ─── CPU time ────────────────────────────────────────────────────────────────

/// Process CPU-time clock (`CLOCK_PROCESS_CPUTIME_ID`)
#[derive(Debug, Clone, Copy)]
pub struct CpuClock {
    precision_ps: i64,
}

impl CpuClock {
    /// Create the clock if the platform provides per-process CPU time
    #[cfg(unix)]
    pub fn new() -> Option<Self> {
        let precision_ps = clock_resolution_ps(libc::CLOCK_PROCESS_CPUTIME_ID)?;
        read_clock_ps(libc::CLOCK_PROCESS_CPUTIME_ID)?;
        Some(Self { precision_ps })
    }

    /// Create the clock if the platform provides per-process CPU time
    #[cfg(not(unix))]
    pub fn new() -> Option<Self> {
        None
    }
}

impl Clock for CpuClock {
    #[inline(always)]
    fn now_ps(&self) -> i64 {
        process_cpu_time_ps()
    }

    fn precision_ps(&self) -> i64 {
        self.precision_ps
    }
}

#[cfg(unix)]
#[inline(always)]
fn process_cpu_time_ps() -> i64 {
    read_clock_ps(libc::CLOCK_PROCESS_CPUTIME_ID).unwrap_or(0)
}

#[cfg(not(unix))]
fn process_cpu_time_ps() -> i64 {
    0
}

#[cfg(unix)]
fn timespec_to_ps(ts: &libc::timespec) -> i64 {
    (ts.tv_sec as i64)
        .saturating_mul(1_000_000_000_000)
        .saturating_add((ts.tv_nsec as i64).saturating_mul(PS_PER_NS))
}

#[cfg(unix)]
fn clock_resolution_ps(clock: libc::clockid_t) -> Option<i64> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_getres(clock, &mut ts) };
    (rc == 0).then(|| timespec_to_ps(&ts).max(1))
}

#[cfg(unix)]
#[inline(always)]
fn read_clock_ps(clock: libc::clockid_t) -> Option<i64> {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, writable timespec for the duration of the call.
    let rc = unsafe { libc::clock_gettime(clock, &mut ts) };
    (rc == 0).then(|| timespec_to_ps(&ts))
}

// ─── CPU affinity ────────────────────────────────────────────────────────────

/// Set CPU affinity to pin the current thread to a specific core
///
/// Avoids core migrations between trials.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    // SAFETY: the set is zero-initialised before use and only passed to
    // libc routines expecting a `cpu_set_t` of exactly this size.
    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// CPU pinning is not supported on this platform
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}
