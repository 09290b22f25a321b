//! Status and severity of a probe run
//!
//! Both serialize lowercase (`"success"`, `"high"`, ...) in the report artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Warning,
    Error,
}

impl ProbeStatus {
    /// Short console marker for the status.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            ProbeStatus::Success => "[ ok ]",
            ProbeStatus::Warning => "[warn]",
            ProbeStatus::Error => "[FAIL]",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Warning => "warning",
            ProbeStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Coarse ranking derived from the issue set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(s)
    }
}
