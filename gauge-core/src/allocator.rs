//! Allocation Accounting
//!
//! A counting wrapper around the system allocator. Install it in the
//! benchmark binary to enable the allocated/copied columns:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: gauge::TrackingAllocator = gauge::TrackingAllocator;
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATED: AtomicU64 = AtomicU64::new(0);
static COPIED: AtomicU64 = AtomicU64::new(0);

/// Global allocator that keeps process-wide byte counters.
///
/// Counters only ever grow. Deallocation is not subtracted: the figures
/// describe allocation traffic, not resident memory.
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            ALLOCATED.fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if new_ptr.is_null() {
            return new_ptr;
        }

        let old_size = layout.size();
        if new_ptr == ptr {
            // resized in place, only growth is new memory
            let grown = new_size.saturating_sub(old_size);
            if grown > 0 {
                ALLOCATED.fetch_add(grown as u64, Ordering::Relaxed);
            }
        } else {
            ALLOCATED.fetch_add(new_size as u64, Ordering::Relaxed);
            COPIED.fetch_add(old_size.min(new_size) as u64, Ordering::Relaxed);
        }
        new_ptr
    }
}

/// Cumulative bytes handed out since process start
#[inline]
pub fn allocated_bytes() -> u64 {
    ALLOCATED.load(Ordering::Relaxed)
}

/// Cumulative bytes moved by relocating reallocations since process start
#[inline]
pub fn copied_bytes() -> u64 {
    COPIED.load(Ordering::Relaxed)
}
