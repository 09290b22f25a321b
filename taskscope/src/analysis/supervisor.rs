//! Supervised probe execution
//!
//! Each probe runs on its own task so a panic is captured by the `JoinHandle`
//! instead of unwinding through the analyzer, and an optional deadline stops
//! a hung probe from stalling the pass.

use log::warn;
use std::any::Any;
use std::time::Duration;
use taskscope_probes::Probe;

/// How a supervised probe run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Completed,
    /// The probe task panicked; carries the panic message.
    Panicked(String),
    /// The deadline expired and the probe task was aborted.
    TimedOut(Duration),
}

impl ProbeOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ProbeOutcome::Completed)
    }
}

/// Run `probe` to completion on a fresh task, bounded by `deadline`.
///
/// Returns once the probe task has finished, panicked, or been aborted.
pub async fn run_supervised(probe: &Probe, deadline: Option<Duration>) -> ProbeOutcome {
    // The action itself is invoked on the spawned task, so synchronous work
    // done before it returns its future is supervised too.
    let task_probe = probe.clone();
    let mut handle = tokio::spawn(async move { task_probe.start().await });

    let joined = match deadline {
        Some(limit) => {
            if let Ok(joined) = tokio::time::timeout(limit, &mut handle).await {
                joined
            } else {
                handle.abort();
                warn!("probe {} exceeded its {limit:?} deadline, aborted", probe.name());
                return ProbeOutcome::TimedOut(limit);
            }
        }
        None => handle.await,
    };

    match joined {
        Ok(()) => ProbeOutcome::Completed,
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            warn!("probe {} panicked: {message}", probe.name());
            ProbeOutcome::Panicked(message)
        }
        // Cancellation only happens while the runtime shuts down.
        Err(e) => ProbeOutcome::Panicked(e.to_string()),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed() {
        let probe = Probe::new("ok", || async {});
        assert_eq!(run_supervised(&probe, None).await, ProbeOutcome::Completed);
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let probe = Probe::new("boom", || async { panic!("probe exploded") });
        let outcome = run_supervised(&probe, Some(Duration::from_secs(1))).await;
        assert_eq!(outcome, ProbeOutcome::Panicked("probe exploded".to_string()));
    }

    #[tokio::test]
    async fn test_formatted_panic_message() {
        let probe = Probe::new("boom", || async { panic!("bad value {}", 42) });
        let outcome = run_supervised(&probe, None).await;
        assert_eq!(outcome, ProbeOutcome::Panicked("bad value 42".to_string()));
    }

    fn panics_before_returning_future() -> std::future::Ready<()> {
        let empty: Vec<u8> = Vec::new();
        let _ = empty[0];
        std::future::ready(())
    }

    #[tokio::test]
    async fn test_panic_in_synchronous_setup_is_captured() {
        let probe = Probe::new("sync_boom", panics_before_returning_future);
        let outcome = run_supervised(&probe, Some(Duration::from_secs(1))).await;
        assert!(matches!(outcome, ProbeOutcome::Panicked(ref msg) if msg.contains("index out of bounds")));
    }

    #[tokio::test]
    async fn test_deadline_aborts_hung_probe() {
        let probe = Probe::new("hang", || std::future::pending::<()>());
        let outcome = run_supervised(&probe, Some(Duration::from_millis(20))).await;
        assert_eq!(outcome, ProbeOutcome::TimedOut(Duration::from_millis(20)));
    }
}
