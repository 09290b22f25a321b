//! Concurrent runner.
//!
//! Starts every probe at once and records when each started and finished.
//! No telemetry is attributed: with all probes in flight together, task and
//! heap counters cannot be split between them.
//!
//! Each probe task reports through an mpsc channel and a single collector
//! owns the result list, so nothing is shared behind a lock.

use super::supervisor::{run_supervised, ProbeOutcome};
use chrono::{DateTime, Utc};
use log::info;
use std::time::{Duration, Instant};
use taskscope_probes::ProbeCatalog;
use tokio::sync::mpsc;

/// Start/end record for one probe of a concurrent pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTiming {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
    pub outcome: ProbeOutcome,
}

/// Run every probe in `catalog` concurrently.
///
/// Timings come back in catalog order regardless of completion order.
pub async fn run_concurrent(catalog: &ProbeCatalog, deadline: Option<Duration>) -> Vec<ProbeTiming> {
    info!("concurrent run of {} probes", catalog.len());

    let (tx, mut rx) = mpsc::unbounded_channel::<(usize, ProbeTiming)>();
    for (index, probe) in catalog.iter().enumerate() {
        let tx = tx.clone();
        let probe = probe.clone();
        tokio::spawn(async move {
            let started_at = Utc::now();
            let start = Instant::now();
            let outcome = run_supervised(&probe, deadline).await;
            let timing = ProbeTiming {
                name: probe.name().to_owned(),
                started_at,
                finished_at: Utc::now(),
                duration: start.elapsed(),
                outcome,
            };
            // Collector outlives every sender.
            let _ = tx.send((index, timing));
        });
    }
    drop(tx);

    let mut timings = Vec::with_capacity(catalog.len());
    while let Some(entry) = rx.recv().await {
        timings.push(entry);
    }
    timings.sort_by_key(|(index, _)| *index);
    timings.into_iter().map(|(_, timing)| timing).collect()
}
