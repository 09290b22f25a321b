//! Telemetry snapshot and delta types

use std::time::Instant;

/// Counters read at one instant. Zero means "not reported".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySnapshot {
    /// Live runtime tasks.
    pub live_workers: i64,
    /// Live heap bytes.
    pub heap_allocated_bytes: u64,
    /// Cumulative garbage-collection passes.
    pub gc_cycles: u64,
    pub taken_at: Instant,
}

impl TelemetrySnapshot {
    /// Signed difference `self - before`.
    ///
    /// The GC counter is cumulative, so a smaller `after` value (a source
    /// reset) saturates to zero instead of wrapping.
    #[must_use]
    pub fn delta_since(&self, before: &TelemetrySnapshot) -> TelemetryDelta {
        TelemetryDelta {
            worker_delta: self.live_workers - before.live_workers,
            memory_delta_bytes: signed_diff(self.heap_allocated_bytes, before.heap_allocated_bytes),
            gc_cycle_delta: self.gc_cycles.saturating_sub(before.gc_cycles),
        }
    }
}

/// Change in counters across one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TelemetryDelta {
    pub worker_delta: i64,
    pub memory_delta_bytes: i64,
    pub gc_cycle_delta: u64,
}

fn signed_diff(after: u64, before: u64) -> i64 {
    if after >= before {
        i64::try_from(after - before).unwrap_or(i64::MAX)
    } else {
        i64::try_from(before - after).map_or(i64::MIN, |d| -d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(workers: i64, heap: u64, gc: u64) -> TelemetrySnapshot {
        TelemetrySnapshot { live_workers: workers, heap_allocated_bytes: heap, gc_cycles: gc, taken_at: Instant::now() }
    }

    #[test]
    fn test_delta_positive() {
        let delta = snap(9, 4096, 5).delta_since(&snap(4, 1024, 2));
        assert_eq!(delta, TelemetryDelta { worker_delta: 5, memory_delta_bytes: 3072, gc_cycle_delta: 3 });
    }

    #[test]
    fn test_delta_negative_workers_and_memory() {
        let delta = snap(2, 1000, 1).delta_since(&snap(4, 3000, 1));
        assert_eq!(delta.worker_delta, -2);
        assert_eq!(delta.memory_delta_bytes, -2000);
        assert_eq!(delta.gc_cycle_delta, 0);
    }

    #[test]
    fn test_gc_delta_saturates() {
        let delta = snap(0, 0, 1).delta_since(&snap(0, 0, 7));
        assert_eq!(delta.gc_cycle_delta, 0);
    }

    #[test]
    fn test_memory_delta_clamps_extremes() {
        assert_eq!(signed_diff(u64::MAX, 0), i64::MAX);
        assert_eq!(signed_diff(0, u64::MAX), i64::MIN);
    }
}
