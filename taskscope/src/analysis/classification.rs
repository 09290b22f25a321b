//! Threshold classification of probe runs.
//!
//! Turns one run's measurements into an ordered issue list plus a status and
//! severity. Predicates are independent, so several issues can fire for the
//! same run; they are evaluated in a fixed order so reports diff cleanly.
//!
//! # Predicates (in order)
//!
//! 1. Probe panicked → `panic: <message>`
//! 2. Probe hit its deadline → `timeout: exceeded <deadline>`
//! 3. `duration > slow` → `slow: <duration>`
//! 4. `worker_delta > leak_workers` → `leak: +<n> workers`
//! 5. `memory_delta > high_memory_bytes` → `high memory: <bytes>`
//! 6. `gc_cycle_delta > frequent_gc_cycles` → `frequent GC`
//!
//! If nothing fires the list holds the single sentinel `no issues`.
//!
//! # Status
//!
//! Panics, timeouts, slow runs and leaks are errors (high severity). Any
//! other issue is a warning (medium). A clean run is a success (low).

use super::supervisor::ProbeOutcome;
use crate::domain::{ProbeStatus, Severity};
use crate::report::format::format_bytes;
use crate::telemetry::TelemetryDelta;
use std::fmt;
use std::time::Duration;

/// Sentinel recorded for a clean run.
pub const NO_ISSUES: &str = "no issues";

/// Classification thresholds. Each predicate fires when the measurement is
/// strictly greater than its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub slow: Duration,
    pub leak_workers: i64,
    pub high_memory_bytes: i64,
    pub frequent_gc_cycles: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slow: Duration::from_millis(500),
            leak_workers: 3,
            high_memory_bytes: 5 * 1024 * 1024,
            frequent_gc_cycles: 2,
        }
    }
}

/// A single finding for a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Panicked(String),
    TimedOut(Duration),
    Slow(Duration),
    Leak(i64),
    HighMemory(i64),
    FrequentGc(u64),
    NoIssues,
}

impl Issue {
    /// Whether this issue makes the run an error rather than a warning.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Issue::Panicked(_) | Issue::TimedOut(_) | Issue::Slow(_) | Issue::Leak(_))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Panicked(msg) => write!(f, "panic: {msg}"),
            Issue::TimedOut(limit) => write!(f, "timeout: exceeded {limit:?}"),
            Issue::Slow(duration) => write!(f, "slow: {duration:?}"),
            Issue::Leak(workers) => write!(f, "leak: +{workers} workers"),
            Issue::HighMemory(bytes) => write!(f, "high memory: {}", format_bytes(*bytes)),
            Issue::FrequentGc(_) => f.write_str("frequent GC"),
            Issue::NoIssues => f.write_str(NO_ISSUES),
        }
    }
}

/// Result of classifying one run. `issues` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub issues: Vec<Issue>,
    pub status: ProbeStatus,
    pub severity: Severity,
}

impl Classification {
    #[must_use]
    pub fn issue_strings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Classify one run against `thresholds`.
#[must_use]
pub fn classify(
    outcome: &ProbeOutcome,
    duration: Duration,
    delta: &TelemetryDelta,
    thresholds: &Thresholds,
) -> Classification {
    let mut issues = Vec::new();

    match outcome {
        ProbeOutcome::Completed => {}
        ProbeOutcome::Panicked(msg) => issues.push(Issue::Panicked(msg.clone())),
        ProbeOutcome::TimedOut(limit) => issues.push(Issue::TimedOut(*limit)),
    }

    if duration > thresholds.slow {
        issues.push(Issue::Slow(duration));
    }
    if delta.worker_delta > thresholds.leak_workers {
        issues.push(Issue::Leak(delta.worker_delta));
    }
    if delta.memory_delta_bytes > thresholds.high_memory_bytes {
        issues.push(Issue::HighMemory(delta.memory_delta_bytes));
    }
    if delta.gc_cycle_delta > thresholds.frequent_gc_cycles {
        issues.push(Issue::FrequentGc(delta.gc_cycle_delta));
    }

    if issues.is_empty() {
        issues.push(Issue::NoIssues);
    }

    let (status, severity) = status_and_severity(&issues);
    Classification { issues, status, severity }
}

/// Derive status and severity from an issue list.
#[must_use]
pub fn status_and_severity(issues: &[Issue]) -> (ProbeStatus, Severity) {
    if issues.iter().any(Issue::is_error) {
        (ProbeStatus::Error, Severity::High)
    } else if issues.iter().any(|i| *i != Issue::NoIssues) {
        (ProbeStatus::Warning, Severity::Medium)
    } else {
        (ProbeStatus::Success, Severity::Low)
    }
}
