//! Runtime telemetry
//!
//! Point-in-time reads of the counters the analyzer diffs around each probe:
//! - [`snapshot`]: snapshot/delta value types
//! - [`source`]: the `TelemetrySource` seam and the Tokio-backed source
//! - [`alloc_counter`]: counting global allocator that supplies heap bytes

pub mod alloc_counter;
pub mod snapshot;
pub mod source;

pub use alloc_counter::{live_heap_bytes, CountingAllocator};
pub use snapshot::{TelemetryDelta, TelemetrySnapshot};
pub use source::{RuntimeTelemetry, TelemetrySource};
