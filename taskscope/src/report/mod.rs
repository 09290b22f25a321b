//! Report model and console rendering
//!
//! - [`model`]: `ProbeResult`, `AnalysisReport` and `Summary`
//! - [`format`]: human-readable byte and duration strings
//! - [`console`]: the line-oriented console report

pub mod console;
pub mod format;
pub mod model;

pub use model::{AnalysisReport, ProbeResult, Summary, RUNTIME_VERSION};
