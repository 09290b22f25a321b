//! Sequential analyzer.
//!
//! Runs a catalog one probe at a time so each probe's telemetry delta belongs
//! to that probe alone. Per probe:
//!
//! ```text
//! sleep(settle_before) ─▶ before = snapshot() ─▶ run probe ─▶ duration
//!        ─▶ sleep(settle_after) ─▶ after = snapshot() ─▶ classify(after - before)
//! ```
//!
//! The settling sleeps narrow, but cannot close, the window in which a
//! neighbouring probe's tasks are still tearing down. Probes that join their
//! own work before returning are measured exactly; the sleeps only absorb
//! stragglers.

use super::classification::{classify, Thresholds};
use super::supervisor::run_supervised;
use crate::report::ProbeResult;
use crate::telemetry::TelemetrySource;
use chrono::Utc;
use log::{debug, info};
use std::time::{Duration, Instant};
use taskscope_probes::{Probe, ProbeCatalog};

/// Pause before the "before" snapshot.
pub const DEFAULT_SETTLE_BEFORE: Duration = Duration::from_millis(100);

/// Pause between probe completion and the "after" snapshot.
pub const DEFAULT_SETTLE_AFTER: Duration = Duration::from_millis(50);

/// Default per-probe deadline.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Analyzer timing and classification policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub settle_before: Duration,
    pub settle_after: Duration,
    /// `None` lets a probe run indefinitely.
    pub probe_timeout: Option<Duration>,
    pub thresholds: Thresholds,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            settle_before: DEFAULT_SETTLE_BEFORE,
            settle_after: DEFAULT_SETTLE_AFTER,
            probe_timeout: Some(DEFAULT_PROBE_TIMEOUT),
            thresholds: Thresholds::default(),
        }
    }
}

/// Runs probes one at a time and measures each against a telemetry source.
pub struct SequentialAnalyzer<S> {
    source: S,
    config: AnalyzerConfig,
}

impl<S: TelemetrySource> SequentialAnalyzer<S> {
    pub fn new(source: S, config: AnalyzerConfig) -> Self {
        Self { source, config }
    }

    /// Run every probe in catalog order.
    pub async fn run(&self, catalog: &ProbeCatalog) -> Vec<ProbeResult> {
        self.run_with_progress(catalog, |_| {}).await
    }

    /// Run every probe in catalog order, handing each result to `on_result`
    /// as soon as it is final.
    pub async fn run_with_progress<F>(&self, catalog: &ProbeCatalog, mut on_result: F) -> Vec<ProbeResult>
    where
        F: FnMut(&ProbeResult),
    {
        info!("sequential analysis of {} probes", catalog.len());

        let mut results = Vec::with_capacity(catalog.len());
        for probe in catalog {
            let result = self.measure(probe).await;
            on_result(&result);
            results.push(result);
        }
        results
    }

    async fn measure(&self, probe: &Probe) -> ProbeResult {
        debug!("{}: settling for {:?}", probe.name(), self.config.settle_before);
        tokio::time::sleep(self.config.settle_before).await;

        let before = self.source.snapshot();
        let started_at = Utc::now();
        let start = Instant::now();

        let outcome = run_supervised(probe, self.config.probe_timeout).await;

        let duration = start.elapsed();
        tokio::time::sleep(self.config.settle_after).await;
        let after = self.source.snapshot();

        let delta = after.delta_since(&before);
        let classification = classify(&outcome, duration, &delta, &self.config.thresholds);

        if !outcome.is_completed() {
            debug!("{}: outcome {outcome:?}", probe.name());
        }
        debug!(
            "{}: {duration:?}, workers {:+}, memory {:+} B, gc {}",
            probe.name(),
            delta.worker_delta,
            delta.memory_delta_bytes,
            delta.gc_cycle_delta
        );

        ProbeResult::new(probe.name(), started_at, duration, &delta, &classification, Utc::now())
    }
}
