use chrono::Utc;
use std::time::Duration;
use taskscope::analysis::{classify, ProbeOutcome, Thresholds};
use taskscope::domain::{ExportError, ProbeStatus};
use taskscope::export::{load_report, save_report};
use taskscope::report::{AnalysisReport, ProbeResult};
use taskscope::telemetry::TelemetryDelta;

fn result(name: &str, duration_ms: u64, workers: i64) -> ProbeResult {
    let delta = TelemetryDelta { worker_delta: workers, memory_delta_bytes: 4096, gc_cycle_delta: 0 };
    let duration = Duration::from_millis(duration_ms);
    let classification = classify(&ProbeOutcome::Completed, duration, &delta, &Thresholds::default());
    ProbeResult::new(name, Utc::now(), duration, &delta, &classification, Utc::now())
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("analysis_report.json");

    let report = AnalysisReport::build(vec![result("simple_task", 3, 0), result("leaky_spawn", 2, 5)]);
    save_report(&report, &path).expect("Failed to save report");

    let loaded = load_report(&path).expect("Failed to load report");
    assert_eq!(loaded, report);
    assert_eq!(loaded.results[1].status, ProbeStatus::Error);
}

#[test]
fn test_save_overwrites_previous_report() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("analysis_report.json");

    save_report(&AnalysisReport::build(vec![result("a", 1, 0), result("b", 1, 0)]), &path).unwrap();
    save_report(&AnalysisReport::build(vec![result("c", 1, 0)]), &path).unwrap();

    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded.total_probes, 1);
    assert_eq!(loaded.results[0].name, "c");

    // Only the report remains; the temp file was renamed into place.
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_save_into_missing_directory_fails_cleanly() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing").join("analysis_report.json");

    let err = save_report(&AnalysisReport::build(Vec::new()), &path).unwrap_err();
    assert!(matches!(err, ExportError::WriteFailed { .. }));
    assert!(!path.exists());
}

#[test]
fn test_artifact_field_names() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("analysis_report.json");
    save_report(&AnalysisReport::build(vec![result("join_set", 12, 0)]), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["results", "timestamp", "runtime_version", "os", "arch", "total_probes"] {
        assert!(value.get(key).is_some(), "missing top-level key {key}");
    }
    let first = &value["results"][0];
    for key in [
        "name",
        "duration_ns",
        "duration_readable",
        "memory_used",
        "memory_bytes",
        "worker_delta",
        "gc_cycles",
        "status",
        "issues",
        "severity",
        "timestamp",
    ] {
        assert!(first.get(key).is_some(), "missing result key {key}");
    }
    assert_eq!(first["issues"][0], "no issues");
}
