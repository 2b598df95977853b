//! Queued operation model and queue state snapshots.

use std::str::FromStr;

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of mutating request held in the offline queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Write a window of draft items
    Save,

    /// Approve/publish a window
    Approve,

    /// Discard a window of draft items
    Delete,

    /// Update a window of draft items
    Update,
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "save" => Ok(OperationKind::Save),
            "approve" => Ok(OperationKind::Approve),
            "delete" => Ok(OperationKind::Delete),
            "update" => Ok(OperationKind::Update),
            _ => Err(format!("Invalid operation kind: {s}")),
        }
    }
}

impl OperationKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Save => "save",
            OperationKind::Approve => "approve",
            OperationKind::Delete => "delete",
            OperationKind::Update => "update",
        }
    }
}

/// Replay priority of a queued operation.
///
/// Variant order is the replay order: the derived `Ord` sorts `Critical`
/// first, so a stable sort on priority preserves enqueue order within a tier.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default,
)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Replayed before everything else
    Critical,

    /// Replayed before normal traffic
    High,

    /// Default priority
    #[default]
    Normal,

    /// Replayed last
    Low,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(format!("Invalid priority: {s}")),
        }
    }
}

impl Priority {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }
}

/// A durable record of a mutating request awaiting replay.
///
/// Created when a write is attempted while offline (or buffered for
/// durability), re-stamped with an incremented `retry_count` on each failed
/// replay, and destroyed on success or when the retry budget is exhausted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueuedOperation {
    /// Unique identifier assigned at enqueue time
    pub id: String,

    /// Kind of mutating request
    pub kind: OperationKind,

    /// Operation payload, interpreted by the executor
    pub data: Value,

    /// When the operation was enqueued (UTC)
    pub enqueued_at: Timestamp,

    /// Number of failed replay attempts so far
    #[serde(default)]
    pub retry_count: u32,

    /// Maximum number of attempts before the operation is dropped
    pub max_retries: u32,

    /// Replay priority
    #[serde(default)]
    pub priority: Priority,
}

/// A terminal per-operation failure, individually attributable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerminalFailure {
    /// Identifier of the dropped operation
    pub operation_id: String,

    /// Kind of the dropped operation
    pub kind: OperationKind,

    /// Attempts made before the operation was dropped
    pub attempts: u32,

    /// Human-readable reason the operation was dropped
    pub reason: String,
}

/// Snapshot of the offline queue, surfaced through subscriptions.
#[derive(Debug, Clone)]
pub struct QueueState {
    /// Current connectivity assumption
    pub is_online: bool,

    /// Operations awaiting replay, in enqueue order
    pub operations: Vec<QueuedOperation>,

    /// Whether a sync pass is currently running
    pub sync_in_progress: bool,

    /// When the last sync pass completed
    pub last_sync_time: Option<Timestamp>,

    /// Operations dropped as terminal, newest last
    pub terminal_failures: Vec<TerminalFailure>,
}
