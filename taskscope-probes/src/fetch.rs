//! Simulated remote fetches.
//!
//! Probes that model "call a remote service" go through here instead of the
//! network so a pass is hermetic and its timing is repeatable.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Base latency of a simulated request.
pub const BASE_LATENCY: Duration = Duration::from_millis(20);

/// URLs under this host fail instead of answering.
pub const UNREACHABLE_HOST: &str = "unreachable.invalid";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("connection refused: {0}")]
    Unreachable(String),
}

/// Latency for `url`: the base latency plus 1ms per path segment, so distinct
/// endpoints finish in a fixed but distinct order.
#[must_use]
pub fn latency_for(url: &str) -> Duration {
    let segments = url.split('/').filter(|s| !s.is_empty()).count();
    BASE_LATENCY + Duration::from_millis(u64::try_from(segments).unwrap_or(u64::MAX))
}

/// Fetch `url` after its simulated latency.
///
/// # Errors
/// Returns `FetchError::Unreachable` for URLs on [`UNREACHABLE_HOST`].
pub async fn simulate_fetch(url: &str) -> Result<String, FetchError> {
    tokio::time::sleep(latency_for(url)).await;
    if url.contains(UNREACHABLE_HOST) {
        return Err(FetchError::Unreachable(url.to_owned()));
    }
    Ok(format!("{url} > 200 OK"))
}

/// Start a fetch on its own task and hand back the channel its single result
/// arrives on. The channel closes once the task finishes.
#[must_use]
pub fn async_fetch(url: &str) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    let url = url.to_owned();
    tokio::spawn(async move {
        let line = match simulate_fetch(&url).await {
            Ok(line) => line,
            Err(e) => format!("error: {e}"),
        };
        // Receiver may have been dropped; nothing to report then.
        let _ = tx.send(line).await;
    });
    rx
}
