//! In-flight request deduplication.
//!
//! Collapses concurrent identical operations: while an execution for a key
//! is in flight, later callers join it instead of triggering a second
//! side-effecting call, and every joiner observes the same outcome. Entries
//! are keyed by a canonical, parameter-order-independent string produced by
//! [`dedup_key`].
//!
//! The pending table is the only state here and it is never persisted; a
//! periodic sweep drops entries older than their timeout so an execution
//! that went dark cannot block its key forever.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

use crate::error::{CadenceError, Result};

/// How long a non-durable in-flight entry may block its key.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// Durable (save-style) operations get a longer leash.
pub const DURABLE_TIMEOUT: Duration = Duration::from_secs(60);

/// How often the background sweep clears expired entries.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

type SharedResult<T> = std::result::Result<T, Arc<CadenceError>>;

struct PendingEntry<T> {
    token: u64,
    started_at: Instant,
    timeout: Duration,
    notify: broadcast::Sender<SharedResult<T>>,
    task: JoinHandle<()>,
}

/// Options for a deduplicated execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Overrides the staleness timeout for this key
    pub timeout: Option<Duration>,
    /// Durable operations default to the longer [`DURABLE_TIMEOUT`]
    pub durable: bool,
}

/// Deduplicates concurrent executions of logical operations sharing a key.
///
/// Generic over the (cloneable) result type; one deduplicator instance
/// serves one family of operations.
pub struct RequestDeduplicator<T: Clone + Send + 'static> {
    pending: Arc<Mutex<HashMap<String, PendingEntry<T>>>>,
    next_token: AtomicU64,
    sweeper: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + 'static> RequestDeduplicator<T> {
    /// Creates a deduplicator with an empty pending table. Call
    /// [`start_sweeper`](Self::start_sweeper) to enable background cleanup.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_token: AtomicU64::new(0),
            sweeper: std::sync::Mutex::new(None),
        }
    }

    /// Executes `operation` under `key`, or joins an execution already in
    /// flight for that key.
    ///
    /// The underlying future runs in its own task, so exactly one
    /// side-effecting execution happens no matter how many callers pile onto
    /// the key before it settles. An in-flight entry older than its timeout
    /// is discarded and a fresh execution started.
    pub async fn execute<F>(&self, key: &str, operation: F, options: ExecuteOptions) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let timeout = options.timeout.unwrap_or(if options.durable {
            DURABLE_TIMEOUT
        } else {
            DEFAULT_TIMEOUT
        });

        let mut rx = {
            let mut pending = self.pending.lock().await;

            if let Some(entry) = pending.get(key) {
                let age = entry.started_at.elapsed();
                if age > entry.timeout {
                    debug!("discarding stale in-flight request '{key}' (age {age:?})");
                    if let Some(stale) = pending.remove(key) {
                        stale.task.abort();
                    }
                }
            }

            match pending.get(key) {
                Some(entry) => {
                    debug!("joining in-flight request '{key}'");
                    entry.notify.subscribe()
                }
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    let token = self.next_token.fetch_add(1, Ordering::Relaxed);
                    let notify = tx.clone();
                    let pending_map = Arc::clone(&self.pending);
                    let owned_key = key.to_string();

                    debug!("starting request '{key}'");
                    let task = tokio::spawn(async move {
                        let outcome = operation.await.map_err(Arc::new);
                        let mut map = pending_map.lock().await;
                        if map.get(&owned_key).is_some_and(|e| e.token == token) {
                            map.remove(&owned_key);
                        }
                        drop(map);
                        let _ = notify.send(outcome);
                    });

                    pending.insert(
                        key.to_string(),
                        PendingEntry {
                            token,
                            started_at: Instant::now(),
                            timeout,
                            notify: tx,
                            task,
                        },
                    );
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(shared)) => Err(shared_error(&shared)),
            // The channel closed without a result: the entry was cancelled.
            Err(_) => Err(CadenceError::Cancelled {
                key: key.to_string(),
            }),
        }
    }

    /// Cancels the in-flight execution for `key`, if any.
    ///
    /// Best-effort for work already started; guaranteed for work that has
    /// not yet reached a side effect. Joiners observe a `Cancelled` error.
    pub async fn cancel(&self, key: &str) -> bool {
        match self.pending.lock().await.remove(key) {
            Some(entry) => {
                debug!("cancelling request '{key}'");
                entry.task.abort();
                true
            }
            None => false,
        }
    }

    /// Whether an execution for `key` is currently in flight.
    pub async fn is_pending(&self, key: &str) -> bool {
        self.pending.lock().await.contains_key(key)
    }

    /// Number of in-flight entries.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Cancels every in-flight execution and clears the table.
    pub async fn clear(&self) {
        let mut pending = self.pending.lock().await;
        for (key, entry) in pending.drain() {
            debug!("clearing in-flight request '{key}'");
            entry.task.abort();
        }
    }

    /// Spawns the periodic sweep that drops entries older than their
    /// timeout even when nobody queries them again.
    pub fn start_sweeper(&self) {
        let pending = Arc::clone(&self.pending);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                let mut map = pending.lock().await;
                map.retain(|key, entry| {
                    let expired = entry.started_at.elapsed() > entry.timeout;
                    if expired {
                        warn!("sweeping expired in-flight request '{key}'");
                        entry.task.abort();
                    }
                    !expired
                });
            }
        });

        let mut sweeper = self.sweeper.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = sweeper.replace(handle) {
            old.abort();
        }
    }

    /// Stops the periodic sweep. In-flight executions are unaffected.
    pub fn shutdown(&self) {
        let mut sweeper = self.sweeper.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = sweeper.take() {
            handle.abort();
        }
    }
}

impl<T: Clone + Send + 'static> Default for RequestDeduplicator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Drop for RequestDeduplicator<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Re-materializes a shared failure for one joiner.
fn shared_error(err: &Arc<CadenceError>) -> CadenceError {
    match err.as_ref() {
        CadenceError::Network { message } => CadenceError::Network {
            message: message.clone(),
        },
        CadenceError::Conflict { message } => CadenceError::Conflict {
            message: message.clone(),
        },
        CadenceError::InvalidInput { field, reason } => CadenceError::InvalidInput {
            field: field.clone(),
            reason: reason.clone(),
        },
        CadenceError::Cancelled { key } => CadenceError::Cancelled { key: key.clone() },
        other => CadenceError::Configuration {
            message: other.to_string(),
        },
    }
}

/// Builds a canonical deduplication key from an operation name and its
/// parameters.
///
/// serde_json maps are ordered, so two logically identical parameter sets
/// serialize to the same key regardless of field order at the call site.
pub fn dedup_key<P: Serialize>(operation: &str, params: &P) -> Result<String> {
    let value = serde_json::to_value(params)?;
    Ok(format!("{operation}:{value}"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_concurrent_calls_execute_once() {
        let dedup = Arc::new(RequestDeduplicator::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let dedup = Arc::clone(&dedup);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                dedup
                    .execute(
                        "fetch:week",
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(7)
                        },
                        ExecuteOptions::default(),
                    )
                    .await
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap().expect("execution should succeed");
            assert_eq!(value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dedup.pending_len().await, 0);
    }

    #[tokio::test]
    async fn test_joiners_share_a_failure() {
        let dedup = Arc::new(RequestDeduplicator::<u32>::new());

        let first = {
            let dedup = Arc::clone(&dedup);
            tokio::spawn(async move {
                dedup
                    .execute(
                        "write:1",
                        async {
                            tokio::time::sleep(Duration::from_millis(30)).await;
                            Err(CadenceError::Network {
                                message: "socket closed".to_string(),
                            })
                        },
                        ExecuteOptions::default(),
                    )
                    .await
            })
        };
        // Give the first caller time to register the entry.
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = dedup
            .execute(
                "write:1",
                async { Ok(99) },
                ExecuteOptions::default(),
            )
            .await;

        assert!(matches!(
            first.await.unwrap(),
            Err(CadenceError::Network { .. })
        ));
        // The joiner never ran its own operation; it sees the shared failure.
        assert!(matches!(second, Err(CadenceError::Network { .. })));
    }

    #[tokio::test]
    async fn test_cancel_pending_request() {
        let dedup = Arc::new(RequestDeduplicator::<u32>::new());

        let waiter = {
            let dedup = Arc::clone(&dedup);
            tokio::spawn(async move {
                dedup
                    .execute(
                        "slow",
                        async {
                            tokio::time::sleep(Duration::from_secs(60)).await;
                            Ok(1)
                        },
                        ExecuteOptions::default(),
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(dedup.is_pending("slow").await);
        assert!(dedup.cancel("slow").await);
        assert!(!dedup.is_pending("slow").await);
        assert!(!dedup.cancel("slow").await);

        assert!(matches!(
            waiter.await.unwrap(),
            Err(CadenceError::Cancelled { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_entry_is_replaced() {
        let dedup = Arc::new(RequestDeduplicator::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let options = ExecuteOptions {
            timeout: Some(Duration::from_millis(10)),
            durable: false,
        };

        let hung = {
            let dedup = Arc::clone(&dedup);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                dedup
                    .execute(
                        "hung",
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_secs(60)).await;
                            Ok(0)
                        },
                        options,
                    )
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;

        // The stale entry must not block the key forever.
        let calls_clone = Arc::clone(&calls);
        let fresh = dedup
            .execute(
                "hung",
                async move {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                },
                options,
            )
            .await
            .expect("fresh execution should run");

        assert_eq!(fresh, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(
            hung.await.unwrap(),
            Err(CadenceError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_dedup_key_is_order_independent() {
        let a = dedup_key("fetch", &json!({"subject_id": 1, "days": 7})).unwrap();
        let b = dedup_key("fetch", &json!({"days": 7, "subject_id": 1})).unwrap();
        assert_eq!(a, b);

        let c = dedup_key("fetch", &json!({"subject_id": 2, "days": 7})).unwrap();
        assert_ne!(a, c);

        let d = dedup_key("publish", &json!({"subject_id": 1, "days": 7})).unwrap();
        assert_ne!(a, d);
    }
}
