//! Offline operation queue.
//!
//! Mutating requests made while the backend is unreachable are recorded as
//! [`QueuedOperation`]s and replayed when connectivity returns. Replay is
//! strictly sequential (writes may depend on earlier writes) and ordered by
//! priority, with enqueue order preserved inside each priority tier. The
//! pending set is persisted through a [`QueueStorage`] backend after every
//! mutation, so a restart resumes exactly where the previous process left
//! off.
//!
//! One failing operation never poisons the rest: each failure is classified
//! on its own, retried while it stays transient and inside its retry budget,
//! and dropped as an individually-recorded terminal failure otherwise.

mod storage;

pub use storage::{MemoryStorage, QueueStorage, SqliteStorage};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::error::{CadenceError, Result};
use crate::models::{QueueState, QueuedOperation, TerminalFailure};
use crate::params::NewOperation;

/// Default cadence of the background replay timer.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Executes one queued operation against the real backend during replay.
#[async_trait]
pub trait SyncExecutor: Send + Sync {
    async fn execute(&self, operation: &QueuedOperation) -> Result<()>;
}

/// Outcome summary of one replay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Operations the pass attempted
    pub attempted: usize,
    /// Operations that succeeded and left the queue
    pub succeeded: usize,
    /// Operations kept for a later pass
    pub retried: usize,
    /// Operations dropped as terminal failures
    pub dropped: usize,
}

type Listener = Arc<dyn Fn(&QueueState) + Send + Sync>;

struct QueueCore {
    is_online: bool,
    operations: Vec<QueuedOperation>,
    sync_in_progress: bool,
    last_sync_time: Option<Timestamp>,
    terminal_failures: Vec<TerminalFailure>,
}

struct QueueInner {
    storage: Box<dyn QueueStorage>,
    executor: Box<dyn SyncExecutor>,
    state: Mutex<QueueCore>,
    subscribers: Mutex<HashMap<u64, Listener>>,
    next_seq: AtomicU64,
    next_subscriber: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Reliable-write queue for a single backend.
pub struct OfflineOperationQueue {
    inner: Arc<QueueInner>,
}

impl OfflineOperationQueue {
    /// Builds a queue over the given storage and replay executor, loading
    /// whatever the previous process left pending. The queue starts in the
    /// online state; connectivity changes arrive via
    /// [`set_online`](Self::set_online).
    pub fn new(storage: Box<dyn QueueStorage>, executor: Box<dyn SyncExecutor>) -> Self {
        let operations = match storage.load() {
            Ok(operations) => operations,
            Err(e) => {
                warn!("queue storage unreadable, starting empty: {e}");
                Vec::new()
            }
        };
        if !operations.is_empty() {
            info!("restored {} pending operation(s)", operations.len());
        }

        Self {
            inner: Arc::new(QueueInner {
                storage,
                executor,
                state: Mutex::new(QueueCore {
                    is_online: true,
                    operations,
                    sync_in_progress: false,
                    last_sync_time: None,
                    terminal_failures: Vec::new(),
                }),
                subscribers: Mutex::new(HashMap::new()),
                next_seq: AtomicU64::new(0),
                next_subscriber: AtomicU64::new(0),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Records a mutating request for later replay and persists the queue.
    /// A persist failure degrades durability for this process but never loses
    /// the in-memory operation or fails the caller.
    ///
    /// While online, a replay attempt is kicked off in the background so the
    /// operation does not sit in the queue until the next timer tick; the
    /// caller is never blocked on it.
    pub fn enqueue(&self, params: NewOperation) -> QueuedOperation {
        let now = Timestamp::now();
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        let operation = QueuedOperation {
            id: format!("op_{}_{}", now.as_millisecond(), seq),
            kind: params.kind,
            data: params.data,
            enqueued_at: now,
            retry_count: 0,
            max_retries: params.max_retries,
            priority: params.priority,
        };
        debug!(
            "enqueued {} operation '{}' at priority {}",
            operation.kind.as_str(),
            operation.id,
            operation.priority.as_str()
        );

        let (is_online, snapshot) = {
            let mut core = self.inner.lock_state();
            core.operations.push(operation.clone());
            (core.is_online, core.operations.clone())
        };
        self.inner.persist(&snapshot);
        self.inner.notify();

        if is_online {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let inner = Arc::clone(&self.inner);
                handle.spawn(async move {
                    inner.run_sync().await;
                });
            }
        }
        operation
    }

    /// Removes one pending operation by id. Returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let (removed, snapshot) = {
            let mut core = self.inner.lock_state();
            let before = core.operations.len();
            core.operations.retain(|op| op.id != id);
            (core.operations.len() < before, core.operations.clone())
        };
        if removed {
            self.inner.persist(&snapshot);
            self.inner.notify();
        }
        removed
    }

    /// Drops every pending operation. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut core = self.inner.lock_state();
            let dropped = core.operations.len();
            core.operations.clear();
            dropped
        };
        if dropped > 0 {
            self.inner.persist(&[]);
            self.inner.notify();
        }
        dropped
    }

    /// Current snapshot of the queue.
    pub fn state(&self) -> QueueState {
        self.inner.snapshot()
    }

    /// Registers a listener invoked once synchronously with the current
    /// snapshot and then after every state change. Returns a token for
    /// [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, listener: F) -> u64
    where
        F: Fn(&QueueState) + Send + Sync + 'static,
    {
        let token = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);
        listener(&self.inner.snapshot());
        self.inner.lock_subscribers().insert(token, listener);
        token
    }

    /// Removes a listener. Returns whether it was registered.
    pub fn unsubscribe(&self, token: u64) -> bool {
        self.inner.lock_subscribers().remove(&token).is_some()
    }

    /// Updates the connectivity assumption. Coming back online triggers an
    /// immediate replay of everything pending.
    pub async fn set_online(&self, online: bool) -> SyncReport {
        let came_online = {
            let mut core = self.inner.lock_state();
            let changed = core.is_online != online;
            core.is_online = online;
            changed && online
        };
        self.inner.notify();

        if came_online {
            info!("connectivity restored, replaying pending operations");
            self.sync().await
        } else {
            SyncReport::default()
        }
    }

    /// Replays pending operations sequentially, highest priority first.
    ///
    /// A no-op while offline, while another pass is running, or when nothing
    /// is pending.
    pub async fn sync(&self) -> SyncReport {
        self.inner.run_sync().await
    }

    /// Starts a background timer that replays pending operations every
    /// `interval` while online.
    pub fn start(&self, interval: Duration) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                inner.run_sync().await;
            }
        });

        let mut timer = self.inner.lock_timer();
        if let Some(old) = timer.replace(handle) {
            old.abort();
        }
    }

    /// Stops the background timer. Pending operations stay queued.
    pub fn shutdown(&self) {
        let mut timer = self.inner.lock_timer();
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

impl Drop for OfflineOperationQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

enum Outcome {
    Done,
    Retry(u32),
    Terminal(TerminalFailure),
}

impl QueueInner {
    fn lock_state(&self) -> std::sync::MutexGuard<'_, QueueCore> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Listener>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> QueueState {
        let core = self.lock_state();
        QueueState {
            is_online: core.is_online,
            operations: core.operations.clone(),
            sync_in_progress: core.sync_in_progress,
            last_sync_time: core.last_sync_time,
            terminal_failures: core.terminal_failures.clone(),
        }
    }

    fn notify(&self) {
        let state = self.snapshot();
        let listeners: Vec<Listener> = self.lock_subscribers().values().cloned().collect();
        for listener in listeners {
            listener(&state);
        }
    }

    /// Best-effort persistence. The in-memory queue is authoritative; a
    /// failed write degrades durability for this process, nothing more.
    fn persist(&self, snapshot: &[QueuedOperation]) {
        if let Err(e) = self.storage.persist(snapshot) {
            warn!("queue persist failed, operations kept in memory only: {e}");
        }
    }

    async fn run_sync(self: &Arc<Self>) -> SyncReport {
        let batch = {
            let mut core = self.lock_state();
            if !core.is_online || core.sync_in_progress || core.operations.is_empty() {
                return SyncReport::default();
            }
            core.sync_in_progress = true;
            // Stable sort: enqueue order survives within a priority tier.
            let mut batch = core.operations.clone();
            batch.sort_by_key(|op| op.priority);
            batch
        };
        self.notify();

        let mut report = SyncReport {
            attempted: batch.len(),
            ..SyncReport::default()
        };
        let mut outcomes: HashMap<String, Outcome> = HashMap::new();
        for op in &batch {
            match self.executor.execute(op).await {
                Ok(()) => {
                    debug!("replayed operation '{}'", op.id);
                    report.succeeded += 1;
                    outcomes.insert(op.id.clone(), Outcome::Done);
                }
                Err(e) => {
                    let attempts = op.retry_count + 1;
                    if e.is_retryable() && attempts <= op.max_retries {
                        warn!(
                            "operation '{}' failed (attempt {attempts} of {}), will retry: {e}",
                            op.id, op.max_retries
                        );
                        report.retried += 1;
                        outcomes.insert(op.id.clone(), Outcome::Retry(attempts));
                    } else {
                        let reason = if e.is_retryable() {
                            CadenceError::ExhaustedRetries {
                                operation_id: op.id.clone(),
                                attempts,
                            }
                            .to_string()
                        } else {
                            e.to_string()
                        };
                        warn!("dropping operation '{}': {reason}", op.id);
                        report.dropped += 1;
                        outcomes.insert(
                            op.id.clone(),
                            Outcome::Terminal(TerminalFailure {
                                operation_id: op.id.clone(),
                                kind: op.kind,
                                attempts,
                                reason,
                            }),
                        );
                    }
                }
            }
        }

        let snapshot = {
            let mut core = self.lock_state();
            let mut kept = Vec::with_capacity(core.operations.len());
            for mut op in std::mem::take(&mut core.operations) {
                match outcomes.remove(&op.id) {
                    // Enqueued while this pass was running; untouched.
                    None => kept.push(op),
                    Some(Outcome::Done) => {}
                    Some(Outcome::Retry(count)) => {
                        op.retry_count = count;
                        kept.push(op);
                    }
                    Some(Outcome::Terminal(failure)) => core.terminal_failures.push(failure),
                }
            }
            core.operations = kept;
            core.sync_in_progress = false;
            core.last_sync_time = Some(Timestamp::now());
            core.operations.clone()
        };
        self.persist(&snapshot);
        self.notify();

        info!(
            "replay pass: {} attempted, {} succeeded, {} retried, {} dropped",
            report.attempted, report.succeeded, report.retried, report.dropped
        );
        report
    }
}
