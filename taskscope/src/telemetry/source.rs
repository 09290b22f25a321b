//! Telemetry sources
//!
//! [`TelemetrySource`] is the only thing the analyzer needs from its host.
//! [`RuntimeTelemetry`] reads the live Tokio runtime and the counting
//! allocator; tests substitute scripted sources.

use super::alloc_counter::live_heap_bytes;
use super::snapshot::TelemetrySnapshot;
use std::time::Instant;

/// Point-in-time reader of runtime counters.
///
/// Implementations must not fail or block: a metric that cannot be read is
/// reported as zero.
pub trait TelemetrySource: Send + Sync {
    fn snapshot(&self) -> TelemetrySnapshot;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for &T {
    fn snapshot(&self) -> TelemetrySnapshot {
        (**self).snapshot()
    }
}

/// Telemetry from the current Tokio runtime and [`CountingAllocator`].
///
/// - live workers: `RuntimeMetrics::num_alive_tasks()` of the runtime the
///   caller runs on, zero outside a runtime
/// - heap bytes: live bytes from the counting allocator, zero if it is not
///   installed
/// - GC cycles: always zero, there is no collector
///
/// [`CountingAllocator`]: super::CountingAllocator
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeTelemetry;

impl RuntimeTelemetry {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether heap bytes are being reported in this process.
    #[must_use]
    pub fn tracks_heap(&self) -> bool {
        live_heap_bytes().is_some()
    }
}

impl TelemetrySource for RuntimeTelemetry {
    fn snapshot(&self) -> TelemetrySnapshot {
        let live_workers = tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_alive_tasks())
            .map_or(0, |n| i64::try_from(n).unwrap_or(i64::MAX));

        TelemetrySnapshot {
            live_workers,
            heap_allocated_bytes: live_heap_bytes().unwrap_or(0),
            gc_cycles: 0,
            taken_at: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_outside_runtime_reports_zero() {
        let snap = RuntimeTelemetry::new().snapshot();
        assert_eq!(snap.live_workers, 0);
        assert_eq!(snap.gc_cycles, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_counts_alive_tasks() {
        let source = RuntimeTelemetry::new();
        let before = source.snapshot();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let parked = tokio::spawn(async move {
            let _ = rx.await;
        });
        let during = source.snapshot();
        assert_eq!(during.delta_since(&before).worker_delta, 1);

        tx.send(()).unwrap();
        parked.await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(source.snapshot().delta_since(&before).worker_delta, 0);
    }
}
