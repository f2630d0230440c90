//! Runtime Statistics
//!
//! Read-only view of the allocation counters, injected into the sampler so
//! tests can substitute a deterministic source.

use crate::allocator::{allocated_bytes, copied_bytes};

/// Cumulative counters at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllocSnapshot {
    /// Bytes allocated so far
    pub allocated: u64,
    /// Bytes copied by relocating reallocations so far
    pub copied: u64,
}

impl AllocSnapshot {
    /// Counter growth from `earlier` to `self`, as signed measurement fields
    pub fn since(&self, earlier: &AllocSnapshot) -> (i64, i64) {
        (
            delta(self.allocated, earlier.allocated),
            delta(self.copied, earlier.copied),
        )
    }
}

fn delta(end: u64, start: u64) -> i64 {
    i64::try_from(end.saturating_sub(start)).unwrap_or(i64::MAX)
}

/// Source of allocation statistics.
pub trait RuntimeStats {
    /// Whether the counters reflect real allocation traffic
    fn is_enabled(&self) -> bool;

    /// Bring the runtime to a quiescent state before a trial starts
    fn settle(&self) {}

    /// Read the cumulative counters
    fn snapshot(&self) -> AllocSnapshot;
}

/// Counters maintained by [`TrackingAllocator`](crate::TrackingAllocator).
#[derive(Debug, Clone, Copy)]
pub struct TrackingStats {
    enabled: bool,
}

impl TrackingStats {
    /// Probe whether the tracking allocator is the global allocator.
    ///
    /// The counters only move when it is installed, so a single heap
    /// allocation is enough to tell.
    pub fn detect() -> Self {
        let before = allocated_bytes();
        let probe = std::hint::black_box(Box::new([0u8; 64]));
        drop(probe);
        let enabled = allocated_bytes() != before;
        tracing::debug!(enabled, "allocation accounting probe");
        Self { enabled }
    }
}

impl RuntimeStats for TrackingStats {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn settle(&self) {
        // Flush counter updates made by other cores before reading
        std::sync::atomic::fence(std::sync::atomic::Ordering::SeqCst);
    }

    fn snapshot(&self) -> AllocSnapshot {
        if !self.enabled {
            return AllocSnapshot::default();
        }
        AllocSnapshot {
            allocated: allocated_bytes(),
            copied: copied_bytes(),
        }
    }
}

/// Accounting unavailable: always zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStats;

impl RuntimeStats for NoStats {
    fn is_enabled(&self) -> bool {
        false
    }

    fn snapshot(&self) -> AllocSnapshot {
        AllocSnapshot::default()
    }
}
