//! Report and trace export
//!
//! - [`json_report`]: the structured JSON artifact (save and reload)
//! - [`trace_event`]: Chrome Trace Event Format timeline for chrome://tracing or Perfetto

pub mod json_report;
pub mod trace_event;

pub use json_report::{load_report, save_report, write_report, DEFAULT_REPORT_PATH};
pub use trace_event::TraceEventExporter;
