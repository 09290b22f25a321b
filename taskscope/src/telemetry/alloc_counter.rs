//! Counting global allocator
//!
//! Rust has no runtime heap statistics, so live heap bytes come from a thin
//! wrapper around the system allocator. A binary opts in with:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: taskscope::telemetry::CountingAllocator = taskscope::telemetry::CountingAllocator::new();
//! ```
//!
//! Counters are process-wide statics, so any instance reports the same values.
//! Without the registration [`live_heap_bytes`] reports `None`.

#![allow(unsafe_code)] // GlobalAlloc is an unsafe trait

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// System allocator that keeps a running count of live bytes.
#[derive(Debug, Default)]
pub struct CountingAllocator;

impl CountingAllocator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn record_alloc(size: usize) {
    LIVE_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    if !ACTIVE.load(Ordering::Relaxed) {
        ACTIVE.store(true, Ordering::Relaxed);
    }
}

fn record_dealloc(size: usize) {
    // Blocks allocated before the allocator was active are never counted, so
    // freeing them must not wrap the counter.
    let _ = LIVE_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |live| {
        Some(live.saturating_sub(size as u64))
    });
}

// SAFETY: every call is forwarded unchanged to `System`; the wrapper only
// updates atomics and never allocates itself.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Live heap bytes, or `None` when [`CountingAllocator`] is not the global
/// allocator of this process.
#[must_use]
pub fn live_heap_bytes() -> Option<u64> {
    ACTIVE.load(Ordering::Relaxed).then(|| LIVE_BYTES.load(Ordering::Relaxed))
}
