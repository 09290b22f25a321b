//! # taskscope - Sequential Concurrency Profiler for Tokio
//!
//! taskscope runs a fixed battery of async concurrency probes one at a time,
//! samples runtime telemetry around each run, and flags probes that are slow,
//! leave tasks behind, grow the heap, or trigger garbage collection.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Probe Catalog (taskscope-probes)                │
//! │   simple_task, join_set, channel_param, ... , run_tasks         │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ one probe at a time
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    taskscope (This Crate)                       │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │  Telemetry   │──▶│   Analysis   │──▶│    Report    │         │
//! │  │ (snapshots)  │   │ (sequential) │   │  (results)   │         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │                            │                  │                 │
//! │                            ▼                  ▼                 │
//! │                     ┌──────────────┐   ┌──────────────┐         │
//! │                     │Classification│   │    Export    │         │
//! │                     │ (thresholds) │   │ (JSON/trace) │         │
//! │                     └──────────────┘   └──────────────┘         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`telemetry`]: live task count and heap bytes behind the `TelemetrySource` seam
//!   - `alloc_counter`: counting global allocator for heap accounting
//! - [`analysis`]: sequential and concurrent runners, panic/deadline supervision,
//!   threshold classification
//! - [`report`]: `ProbeResult`, `AnalysisReport`, summary and console rendering
//! - [`export`]: JSON report sink and Chrome Trace Event Format timeline
//! - [`cli`]: command-line argument parsing and configuration
//! - [`domain`]: status and severity enums, export errors
//!
//! ## Operational Modes
//!
//! 1. **Sequential** (default): measure each probe in isolation, write `analysis_report.json`
//! 2. **Concurrent** (`--concurrent`): start every probe at once, print start/end times
//! 3. **Replay** (`--replay report.json`): re-render a saved report
//!
//! ## Typical Usage
//!
//! ```bash
//! # Full battery, report to ./analysis_report.json
//! taskscope
//!
//! # Include the leaking probe and export a timeline for Perfetto
//! taskscope --with-leak --trace trace.json
//! ```
//!
//! ## Telemetry Caveats
//!
//! - Heap bytes are only tracked when the binary installs
//!   [`telemetry::CountingAllocator`] as its global allocator; otherwise the
//!   memory delta is zero.
//! - Rust has no garbage collector, so the GC cycle count is always zero and
//!   the "frequent GC" predicate never fires against live telemetry.

// Expose modules for testing
pub mod analysis;
pub mod cli;
pub mod domain;
pub mod export;
pub mod report;
pub mod telemetry;
