//! Report data model.
//!
//! `ProbeResult` and `AnalysisReport` are the wire format of the structured
//! artifact; every field round-trips through JSON unchanged.

use super::format::{format_bytes, format_duration};
use crate::analysis::Classification;
use crate::domain::{ProbeStatus, Severity};
use crate::telemetry::TelemetryDelta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `rustc --version` of the toolchain that built this binary.
pub const RUNTIME_VERSION: &str = env!("TASKSCOPE_RUSTC_VERSION");

/// Measurements and verdict for one probe run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub name: String,
    /// Wall-clock time the probe was started.
    pub started_at: DateTime<Utc>,
    #[serde(rename = "duration_ns", with = "duration_nanos")]
    pub duration: Duration,
    pub duration_readable: String,
    /// Human-readable `memory_bytes`.
    pub memory_used: String,
    /// Signed heap delta across the run.
    pub memory_bytes: i64,
    /// Signed live-task delta across the run.
    pub worker_delta: i64,
    /// GC passes during the run (zero when the runtime has no collector).
    pub gc_cycles: u64,
    pub status: ProbeStatus,
    /// Ordered findings. Never empty.
    pub issues: Vec<String>,
    pub severity: Severity,
    /// Wall-clock time the result was finalized.
    pub timestamp: DateTime<Utc>,
}

impl ProbeResult {
    #[must_use]
    pub fn new(
        name: &str,
        started_at: DateTime<Utc>,
        duration: Duration,
        delta: &TelemetryDelta,
        classification: &Classification,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            started_at,
            duration,
            duration_readable: format_duration(duration),
            memory_used: format_bytes(delta.memory_delta_bytes),
            memory_bytes: delta.memory_delta_bytes,
            worker_delta: delta.worker_delta,
            gc_cycles: delta.gc_cycle_delta,
            status: classification.status,
            issues: classification.issue_strings(),
            severity: classification.severity,
            timestamp,
        }
    }
}

/// Everything one analysis pass produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Results in execution order.
    pub results: Vec<ProbeResult>,
    pub timestamp: DateTime<Utc>,
    pub runtime_version: String,
    pub os: String,
    pub arch: String,
    /// Always `results.len()`.
    pub total_probes: usize,
}

impl AnalysisReport {
    /// Wrap `results` with environment metadata and the current time.
    #[must_use]
    pub fn build(results: Vec<ProbeResult>) -> Self {
        Self {
            total_probes: results.len(),
            results,
            timestamp: Utc::now(),
            runtime_version: RUNTIME_VERSION.to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_results(&self.results)
    }
}

/// Counts by status and duration totals over a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub warnings: usize,
    pub errors: usize,
    pub total_duration: Duration,
}

impl Summary {
    #[must_use]
    pub fn from_results(results: &[ProbeResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            acc.total_duration += r.duration;
            match r.status {
                ProbeStatus::Success => acc.success += 1,
                ProbeStatus::Warning => acc.warnings += 1,
                ProbeStatus::Error => acc.errors += 1,
            }
            acc
        })
    }

    /// Mean probe duration, `None` when there are no results.
    #[must_use]
    pub fn average_duration(&self) -> Option<Duration> {
        let count = u32::try_from(self.total).ok().filter(|&n| n > 0)?;
        Some(self.total_duration / count)
    }
}

/// Serde adapter storing a `Duration` as integer nanoseconds.
mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(d.as_nanos()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{classify, ProbeOutcome, Thresholds};

    fn result(name: &str, duration_ms: u64, workers: i64) -> ProbeResult {
        let delta = TelemetryDelta { worker_delta: workers, memory_delta_bytes: 2048, gc_cycle_delta: 0 };
        let duration = Duration::from_millis(duration_ms);
        let classification = classify(&ProbeOutcome::Completed, duration, &delta, &Thresholds::default());
        ProbeResult::new(name, Utc::now(), duration, &delta, &classification, Utc::now())
    }

    #[test]
    fn test_probe_result_fields() {
        let r = result("join_set", 12, 0);
        assert_eq!(r.duration_readable, "12.0 ms");
        assert_eq!(r.memory_used, "2.0 KB");
        assert_eq!(r.memory_bytes, 2048);
        assert_eq!(r.issues, vec!["no issues"]);
    }

    #[test]
    fn test_build_counts_results() {
        let report = AnalysisReport::build(vec![result("a", 1, 0), result("b", 2, 0)]);
        assert_eq!(report.total_probes, 2);
        assert_eq!(report.total_probes, report.results.len());
        assert_eq!(report.runtime_version, RUNTIME_VERSION);
        assert!(!report.runtime_version.is_empty());
    }

    #[test]
    fn test_build_is_idempotent_except_timestamp() {
        let results = vec![result("a", 1, 0), result("b", 700, 5)];
        let mut first = AnalysisReport::build(results.clone());
        let second = AnalysisReport::build(results);
        first.timestamp = second.timestamp;
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_counts_by_status() {
        let summary = Summary::from_results(&[result("ok", 100, 0), result("slow", 600, 0), result("leak", 100, 4)]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.total_duration, Duration::from_millis(800));
        assert_eq!(summary.average_duration(), Some(Duration::from_nanos(266_666_666)));
    }

    #[test]
    fn test_summary_of_nothing_has_no_average() {
        let summary = AnalysisReport::build(Vec::new()).summary();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_duration(), None);
    }

    #[test]
    fn test_json_round_trip() {
        let report = AnalysisReport::build(vec![result("a", 3, -2), result("b", 900, 6)]);
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.results[0].worker_delta, -2);
    }

    #[test]
    fn test_json_field_names() {
        let report = AnalysisReport::build(vec![result("a", 3, 0)]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total_probes"], 1);
        assert_eq!(value["results"][0]["duration_ns"], 3_000_000);
        assert_eq!(value["results"][0]["status"], "success");
        assert_eq!(value["results"][0]["severity"], "low");
    }
}
