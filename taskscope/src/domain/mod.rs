//! Domain model for taskscope
//!
//! This module contains core domain types and errors that provide:
//! - Closed sets for probe status and severity
//! - Structured error handling for the report sinks

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{ProbeStatus, Severity};

pub use errors::ExportError;
