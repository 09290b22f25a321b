#![allow(clippy::cast_precision_loss)]

use crate::analysis::{ProbeOutcome, ProbeTiming};
use crate::domain::ExportError;
use crate::report::ProbeResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

/// Chrome Trace Event format
/// Format reference: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU/preview
#[derive(Debug, Clone, Serialize)]
struct TraceEvent {
    /// Probe name
    name: String,
    cat: String,
    /// Phase: "X" = complete, "M" = metadata
    ph: String,
    /// Timestamp in microseconds, relative to the first probe start
    ts: f64,
    /// Duration in microseconds ("X" events only)
    #[serde(skip_serializing_if = "Option::is_none")]
    dur: Option<f64>,
    pid: u32,
    /// One lane per probe in concurrent runs, a single lane otherwise
    tid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    args: Option<BTreeMap<String, JsonValue>>,
}

#[derive(Debug, Serialize)]
struct TraceFile {
    #[serde(rename = "traceEvents")]
    trace_events: Vec<TraceEvent>,
    #[serde(rename = "displayTimeUnit")]
    display_time_unit: String,
}

/// Pending span before timestamps are made relative.
#[derive(Debug, Clone)]
struct Span {
    name: String,
    lane: u32,
    started_at: DateTime<Utc>,
    duration: Duration,
    args: BTreeMap<String, JsonValue>,
}

/// Collects probe runs and writes them as a Chrome trace timeline.
#[derive(Debug, Default)]
pub struct TraceEventExporter {
    spans: Vec<Span>,
    lanes: BTreeMap<u32, String>,
}

impl TraceEventExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an exporter holding every result of a sequential pass.
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let mut exporter = Self::new();
        for result in results {
            exporter.add_result(result);
        }
        exporter
    }

    /// Add a sequential result. All sequential spans share lane 0.
    pub fn add_result(&mut self, result: &ProbeResult) {
        self.lanes.entry(0).or_insert_with(|| "sequential".to_string());

        let mut args = BTreeMap::new();
        args.insert("status".to_string(), serde_json::json!(result.status));
        args.insert("severity".to_string(), serde_json::json!(result.severity));
        args.insert("issues".to_string(), serde_json::json!(result.issues));
        args.insert("worker_delta".to_string(), serde_json::json!(result.worker_delta));
        args.insert("memory_bytes".to_string(), serde_json::json!(result.memory_bytes));

        self.spans.push(Span {
            name: result.name.clone(),
            lane: 0,
            started_at: result.started_at,
            duration: result.duration,
            args,
        });
    }

    /// Add a concurrent timing on its own lane, numbered from 1.
    pub fn add_timing(&mut self, timing: &ProbeTiming) {
        let lane = u32::try_from(self.lanes.len() + 1).unwrap_or(u32::MAX);
        self.lanes.insert(lane, timing.name.clone());

        let outcome = match &timing.outcome {
            ProbeOutcome::Completed => "completed".to_string(),
            ProbeOutcome::Panicked(msg) => format!("panic: {msg}"),
            ProbeOutcome::TimedOut(limit) => format!("timeout: exceeded {limit:?}"),
        };
        let mut args = BTreeMap::new();
        args.insert("outcome".to_string(), serde_json::json!(outcome));

        self.spans.push(Span {
            name: timing.name.clone(),
            lane,
            started_at: timing.started_at,
            duration: timing.duration,
            args,
        });
    }

    /// Export the trace to any writer (file, stdout, buffer, etc.)
    pub fn export<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let pid = std::process::id();
        let origin = self.spans.iter().map(|s| s.started_at).min();

        let mut events: Vec<TraceEvent> = self
            .spans
            .iter()
            .map(|span| {
                let offset = origin
                    .and_then(|o| (span.started_at - o).num_microseconds())
                    .unwrap_or(0);
                TraceEvent {
                    name: span.name.clone(),
                    cat: "probe".to_string(),
                    ph: "X".to_string(),
                    ts: offset as f64,
                    dur: Some(span.duration.as_nanos() as f64 / 1000.0),
                    pid,
                    tid: span.lane,
                    args: Some(span.args.clone()),
                }
            })
            .collect();

        for (lane, name) in &self.lanes {
            let mut args = BTreeMap::new();
            args.insert("name".to_string(), serde_json::json!(name));
            events.push(TraceEvent {
                name: "thread_name".to_string(),
                cat: String::new(),
                ph: "M".to_string(),
                ts: 0.0,
                dur: None,
                pid,
                tid: *lane,
                args: Some(args),
            });
        }

        let trace = TraceFile { trace_events: events, display_time_unit: "ms".to_string() };
        serde_json::to_writer_pretty(writer, &trace)?;
        Ok(())
    }

    /// Number of probe spans collected
    pub fn event_count(&self) -> usize {
        self.spans.len()
    }
}
