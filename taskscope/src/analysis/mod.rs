//! Analysis logic for probe runs
//!
//! This module contains the orchestration and thresholding logic, separated
//! from the report sinks:
//! - [`sequential`]: one probe at a time with before/after telemetry
//! - [`concurrent`]: every probe at once, timings only
//! - [`classification`]: thresholds to issues, status and severity
//! - [`supervisor`]: panic and deadline isolation for a single probe

pub mod classification;
pub mod concurrent;
pub mod sequential;
pub mod supervisor;

pub use classification::{classify, Classification, Issue, Thresholds};
pub use concurrent::{run_concurrent, ProbeTiming};
pub use sequential::{AnalyzerConfig, SequentialAnalyzer};
pub use supervisor::{run_supervised, ProbeOutcome};
