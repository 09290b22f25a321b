//! Concurrency pattern probes.
//!
//! Every probe here joins the work it spawns before returning, except
//! [`leaky_spawn`]. Output goes through `log` at debug level so a pass stays
//! quiet unless `RUST_LOG=debug` is set.

use crate::fetch::{async_fetch, simulate_fetch};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Semaphore};
use tokio::task::JoinSet;
use tokio::time::sleep;

const GET_URL: &str = "https://example.test/get";
const UUID_URL: &str = "https://example.test/uuid";

/// Number of permits in [`bounded_fetch`].
pub const FETCH_CONCURRENCY: usize = 2;

/// Number of requests issued by [`bounded_fetch`].
pub const FETCH_REQUESTS: usize = 6;

/// Number of tasks [`leaky_spawn`] leaves behind.
pub const LEAKED_TASKS: usize = 5;

/// Fire-and-forget task, then a fixed wait long enough for it to run.
pub async fn simple_task() {
    tokio::spawn(async {
        debug!("simple_task: hello from a spawned task");
    });
    sleep(Duration::from_millis(50)).await;
}

/// Wait-group style: spawn two tasks and join both.
pub async fn join_set() {
    let mut set = JoinSet::new();
    for id in 1..=2 {
        set.spawn(async move {
            debug!("join_set: task {id} done");
        });
    }
    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            warn!("join_set: task failed: {e}");
        }
    }
    debug!("join_set: all tasks done");
}

async fn send_to_channel(tx: mpsc::Sender<String>, msg: String) {
    // Receiver lives until the value is read.
    let _ = tx.send(msg).await;
}

async fn receive_from_channel(rx: &mut mpsc::Receiver<String>) -> Option<String> {
    rx.recv().await
}

/// Channel halves passed as parameters to a sender task and a receiver.
pub async fn channel_param() {
    let (tx, mut rx) = mpsc::channel(1);
    let sender =
        tokio::spawn(send_to_channel(tx, "hello through a channel parameter".to_string()));
    if let Some(msg) = receive_from_channel(&mut rx).await {
        debug!("channel_param: received {msg}");
    }
    let _ = sender.await;
}

/// Functions that return a receiver for work running on their own task.
pub async fn return_channel() {
    let mut a = async_fetch(GET_URL);
    let mut b = async_fetch(UUID_URL);
    debug!("return_channel: got a: {:?}", a.recv().await);
    debug!("return_channel: got b: {:?}", b.recv().await);
}

/// Producer closes the channel; the consumer drains until `None`.
pub async fn with_range() {
    let (tx, mut rx) = mpsc::channel(1);
    let producer = tokio::spawn(async move {
        for i in 1..=3 {
            if tx.send(format!("with_range item #{i}")).await.is_err() {
                break;
            }
        }
    });
    while let Some(item) = rx.recv().await {
        debug!("with_range: got {item}");
    }
    let _ = producer.await;
}

/// Race a reply against a timeout.
pub async fn with_select() {
    let (tx, rx) = oneshot::channel();
    let worker = tokio::spawn(async move {
        sleep(Duration::from_millis(100)).await;
        let _ = tx.send("done");
    });

    tokio::select! {
        reply = rx => match reply {
            Ok(msg) => debug!("with_select: got {msg}"),
            Err(_) => warn!("with_select: worker dropped its sender"),
        },
        () = sleep(Duration::from_millis(200)) => debug!("with_select: timeout"),
    }
    let _ = worker.await;
}

/// Error-group style: parallel fetches where the first failure cancels the rest.
pub async fn with_try_join() {
    let mut set = JoinSet::new();
    for url in [GET_URL, UUID_URL] {
        set.spawn(simulate_fetch(url));
    }

    let mut bodies = Vec::with_capacity(2);
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(Ok(body)) => bodies.push(body),
            Ok(Err(e)) => {
                warn!("with_try_join: {e}");
                set.abort_all();
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => warn!("with_try_join: task failed: {e}"),
        }
    }
    for body in &bodies {
        debug!("with_try_join: {body}");
    }
}

/// Merge two receivers into one. The merged channel closes once both inputs
/// have closed.
#[must_use]
pub fn fan_in(mut a: mpsc::Receiver<String>, mut b: mpsc::Receiver<String>) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        let (mut a_open, mut b_open) = (true, true);
        while a_open || b_open {
            let next = tokio::select! {
                v = a.recv(), if a_open => {
                    a_open = v.is_some();
                    v
                }
                v = b.recv(), if b_open => {
                    b_open = v.is_some();
                    v
                }
                else => break,
            };
            if let Some(v) = next {
                if tx.send(v).await.is_err() {
                    break;
                }
            }
        }
    });
    rx
}

/// Fan-in of two fetch channels, read to completion.
pub async fn merge_channels() {
    let mut merged = fan_in(async_fetch(GET_URL), async_fetch(UUID_URL));
    while let Some(line) = merged.recv().await {
        debug!("merge_channels: merged {line}");
    }
}

/// Parallel fetches bounded by a semaphore.
pub async fn bounded_fetch() {
    let permits = Arc::new(Semaphore::new(FETCH_CONCURRENCY));
    let mut set = JoinSet::new();
    for i in 0..FETCH_REQUESTS {
        let permits = Arc::clone(&permits);
        set.spawn(async move {
            let _permit = permits.acquire_owned().await.ok()?;
            simulate_fetch(&format!("https://example.test/item/{i}")).await.ok()
        });
    }

    let mut fetched = 0usize;
    while let Some(joined) = set.join_next().await {
        if matches!(joined, Ok(Some(_))) {
            fetched += 1;
        }
    }
    debug!(
        "bounded_fetch: {fetched}/{FETCH_REQUESTS} fetched, at most {FETCH_CONCURRENCY} in flight"
    );
}

/// One long producer streaming partial sums, a consumer, and a handful of
/// short tasks, all joined together.
pub async fn run_tasks() {
    let (tx, mut rx) = mpsc::channel::<u64>(1);
    let mut set = JoinSet::new();

    set.spawn(async move {
        let mut sum: u64 = 0;
        for i in 0..1_000_000u64 {
            sum += i;
            if i % 100_000 == 0 && tx.send(sum).await.is_err() {
                break;
            }
        }
    });

    set.spawn(async move {
        while let Some(chunk) = rx.recv().await {
            debug!("run_tasks: partial sum {chunk}");
        }
    });

    for id in 1..=5 {
        set.spawn(async move {
            debug!("run_tasks: small task {id} ready");
        });
    }

    while set.join_next().await.is_some() {}
}

/// Spawns tasks that never complete and returns immediately.
pub async fn leaky_spawn() {
    for _ in 0..LEAKED_TASKS {
        tokio::spawn(std::future::pending::<()>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_in_forwards_everything_then_closes() {
        let (tx_a, rx_a) = mpsc::channel(4);
        let (tx_b, rx_b) = mpsc::channel(4);
        tx_a.send("a1".to_string()).await.unwrap();
        tx_b.send("b1".to_string()).await.unwrap();
        tx_a.send("a2".to_string()).await.unwrap();
        drop(tx_a);
        drop(tx_b);

        let mut merged = fan_in(rx_a, rx_b);
        let mut got = Vec::new();
        while let Some(v) = merged.recv().await {
            got.push(v);
        }
        got.sort();
        assert_eq!(got, vec!["a1", "a2", "b1"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_with_select_gets_reply_before_timeout() {
        let start = tokio::time::Instant::now();
        with_select().await;
        assert!(start.elapsed() < Duration::from_millis(200));
    }
}
