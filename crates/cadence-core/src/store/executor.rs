//! Replay adapter between the offline queue and the staging store.

use async_trait::async_trait;
use serde_json::Value;

use super::StagingStore;
use crate::{
    dedup::{dedup_key, ExecuteOptions, RequestDeduplicator},
    error::Result,
    models::{OperationKind, QueuedOperation},
    params::{OverwriteWindow, Window},
    queue::SyncExecutor,
};

/// Replays queued operations against a [`StagingStore`].
///
/// `Save` and `Update` carry [`OverwriteWindow`] payloads; `Approve` and
/// `Delete` carry bare [`Window`]s. A payload that no longer deserializes is
/// a non-retryable failure, so the queue drops it as terminal instead of
/// burning its retry budget.
///
/// Every execution goes through a [`RequestDeduplicator`] keyed by the
/// operation kind and payload: concurrent identical replays (a timer pass
/// racing a manual flush, or two callers sharing one executor) collapse into
/// a single store write. Save-style operations use the durable timeout.
pub struct StoreExecutor {
    store: StagingStore,
    dedup: RequestDeduplicator<()>,
}

impl StoreExecutor {
    pub fn new(store: StagingStore) -> Self {
        Self {
            store,
            dedup: RequestDeduplicator::new(),
        }
    }

    async fn apply(store: StagingStore, kind: OperationKind, data: Value) -> Result<()> {
        match kind {
            OperationKind::Save | OperationKind::Update => {
                let params: OverwriteWindow = serde_json::from_value(data)?;
                store.overwrite_window(&params).await?;
            }
            OperationKind::Approve => {
                let window: Window = serde_json::from_value(data)?;
                store.publish_window(&window).await?;
            }
            OperationKind::Delete => {
                let window: Window = serde_json::from_value(data)?;
                store.discard_window(&window).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SyncExecutor for StoreExecutor {
    async fn execute(&self, operation: &QueuedOperation) -> Result<()> {
        let key = dedup_key(operation.kind.as_str(), &operation.data)?;
        let options = ExecuteOptions {
            durable: matches!(
                operation.kind,
                OperationKind::Save | OperationKind::Update
            ),
            ..ExecuteOptions::default()
        };

        self.dedup
            .execute(
                &key,
                Self::apply(self.store.clone(), operation.kind, operation.data.clone()),
                options,
            )
            .await
    }
}
