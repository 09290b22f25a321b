//! Console report rendering.
//!
//! Renders to `String` so output can be checked in tests; the `print_*`
//! wrappers write to stdout. The layout is for people and may change.

use super::format::format_duration;
use super::model::{AnalysisReport, ProbeResult, Summary};
use crate::analysis::{ProbeOutcome, ProbeTiming};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 50;

/// One-line status for a result, printed as the pass progresses.
#[must_use]
pub fn progress_line(result: &ProbeResult) -> String {
    format!(
        "{} {}: {}, memory: {}, workers: {:+}",
        result.status.marker(),
        result.name,
        result.duration_readable,
        result.memory_used,
        result.worker_delta
    )
}

/// Per-probe blocks followed by the summary block.
#[must_use]
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);

    let _ = writeln!(out, "\n{heavy}");
    let _ = writeln!(out, "SEQUENTIAL ANALYSIS RESULTS");
    let _ = writeln!(out, "{heavy}");

    for result in &report.results {
        let _ = writeln!(out, "\n{} {}", result.status.marker(), result.name);
        let _ = writeln!(out, "   ├─ duration: {}", result.duration_readable);
        let _ = writeln!(out, "   ├─ memory:   {}", result.memory_used);
        let _ = writeln!(out, "   ├─ workers:  {:+}", result.worker_delta);
        let _ = writeln!(out, "   └─ issues:   {}", result.issues.join(", "));
    }

    out.push_str(&render_summary(&report.summary()));
    out
}

/// Summary block: totals by status, total and average duration.
#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let average = summary.average_duration().map_or_else(|| "n/a".to_string(), format_duration);

    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "   ├─ probes:         {}", summary.total);
    let _ = writeln!(out, "   ├─ success:        {}", summary.success);
    let _ = writeln!(out, "   ├─ warnings:       {}", summary.warnings);
    let _ = writeln!(out, "   ├─ errors:         {}", summary.errors);
    let _ = writeln!(out, "   ├─ total duration: {}", format_duration(summary.total_duration));
    let _ = writeln!(out, "   └─ average:        {average}");
    out
}

/// Start, end and duration per probe of a concurrent run.
#[must_use]
pub fn render_timings(timings: &[ProbeTiming]) -> String {
    let mut out = String::from("\nAll probes finished. Start and end per probe:\n");
    for t in timings {
        let _ = write!(
            out,
            "{} -> start: {}, end: {}, duration: {}",
            t.name,
            t.started_at.format("%H:%M:%S%.3f"),
            t.finished_at.format("%H:%M:%S%.3f"),
            format_duration(t.duration)
        );
        match &t.outcome {
            ProbeOutcome::Completed => {}
            ProbeOutcome::Panicked(msg) => {
                let _ = write!(out, " (panic: {msg})");
            }
            ProbeOutcome::TimedOut(limit) => {
                let _ = write!(out, " (timeout: exceeded {limit:?})");
            }
        }
        out.push('\n');
    }
    out
}

pub fn print_report(report: &AnalysisReport) {
    print!("{}", render_report(report));
}

pub fn print_timings(timings: &[ProbeTiming]) {
    print!("{}", render_timings(timings));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{classify, Thresholds};
    use crate::telemetry::TelemetryDelta;
    use chrono::Utc;
    use std::time::Duration;

    fn result(name: &str, duration_ms: u64, workers: i64) -> ProbeResult {
        let delta = TelemetryDelta { worker_delta: workers, ..TelemetryDelta::default() };
        let duration = Duration::from_millis(duration_ms);
        let c = classify(&ProbeOutcome::Completed, duration, &delta, &Thresholds::default());
        ProbeResult::new(name, Utc::now(), duration, &delta, &c, Utc::now())
    }

    #[test]
    fn test_progress_line() {
        let line = progress_line(&result("leaky_spawn", 2, 5));
        assert_eq!(line, "[FAIL] leaky_spawn: 2.0 ms, memory: 0 B, workers: +5");
    }

    #[test]
    fn test_report_lists_probes_then_summary() {
        let report = AnalysisReport::build(vec![result("first", 10, 0), result("second", 600, 0)]);
        let text = render_report(&report);

        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        let summary = text.find("SUMMARY").unwrap();
        assert!(first < second && second < summary);
        assert!(text.contains("└─ issues:   slow: 600ms"));
        assert!(text.contains("errors:         1"));
        assert!(text.contains("average:        305.0 ms"));
    }

    #[test]
    fn test_empty_report_has_guarded_average() {
        let text = render_report(&AnalysisReport::build(Vec::new()));
        assert!(text.contains("probes:         0"));
        assert!(text.contains("average:        n/a"));
    }

    #[test]
    fn test_render_timings_marks_failures() {
        let now = Utc::now();
        let timings = vec![
            ProbeTiming {
                name: "ok".to_string(),
                started_at: now,
                finished_at: now,
                duration: Duration::from_millis(5),
                outcome: ProbeOutcome::Completed,
            },
            ProbeTiming {
                name: "hang".to_string(),
                started_at: now,
                finished_at: now,
                duration: Duration::from_secs(1),
                outcome: ProbeOutcome::TimedOut(Duration::from_secs(1)),
            },
        ];
        let text = render_timings(&timings);
        assert!(text.contains("ok -> start:"));
        assert!(text.contains("duration: 5.0 ms\n"));
        assert!(text.contains("(timeout: exceeded 1s)"));
    }
}
