//! Durable storage backends for the offline operation queue.
//!
//! The queue persists its pending operations after every mutation so that a
//! process restart replays exactly what was pending. A corrupt record is
//! logged and skipped rather than failing the load; losing one record beats
//! refusing to start.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::warn;
use rusqlite::{params, Connection};

use crate::error::{CadenceError, DatabaseResultExt, Result};
use crate::models::QueuedOperation;

/// Where the queue keeps its pending operations between runs.
pub trait QueueStorage: Send + Sync {
    /// Loads the persisted operations, oldest first.
    fn load(&self) -> Result<Vec<QueuedOperation>>;

    /// Replaces the persisted set with `operations`.
    fn persist(&self, operations: &[QueuedOperation]) -> Result<()>;
}

/// In-memory storage. Cloning shares the backing store, so a "restarted"
/// queue built on a clone sees what its predecessor persisted.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<Mutex<Vec<QueuedOperation>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<QueuedOperation>> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn persist(&self, operations: &[QueuedOperation]) -> Result<()> {
        *self.records.lock().unwrap_or_else(|e| e.into_inner()) = operations.to_vec();
        Ok(())
    }
}

const CREATE_QUEUE_TABLE: &str = "CREATE TABLE IF NOT EXISTS queued_operations (
    id TEXT PRIMARY KEY,
    record TEXT NOT NULL,
    enqueued_at TEXT NOT NULL
)";

const SELECT_RECORDS: &str =
    "SELECT record FROM queued_operations ORDER BY enqueued_at ASC, id ASC";

const DELETE_RECORDS: &str = "DELETE FROM queued_operations";

const INSERT_RECORD: &str =
    "INSERT INTO queued_operations (id, record, enqueued_at) VALUES (?1, ?2, ?3)";

/// SQLite-backed storage. Operations are stored as one JSON record per row
/// so schema evolution happens through serde defaults, not migrations.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Returns the default queue database path following XDG Base Directory
    /// specification.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file("queue.db")
            .map_err(|e| CadenceError::XdgDirectory(e.to_string()))
    }

    /// Opens (creating if needed) the queue table at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).db_context("Failed to open queue storage")?;
        conn.execute(CREATE_QUEUE_TABLE, [])
            .db_context("Failed to create queue table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl QueueStorage for SqliteStorage {
    fn load(&self) -> Result<Vec<QueuedOperation>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn
            .prepare(SELECT_RECORDS)
            .db_context("Failed to prepare queue load")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .db_context("Failed to read queue records")?;

        let mut operations = Vec::new();
        for row in rows {
            let record = row.db_context("Failed to read queue record")?;
            match serde_json::from_str::<QueuedOperation>(&record) {
                Ok(op) => operations.push(op),
                Err(e) => warn!("skipping corrupt queued operation record: {e}"),
            }
        }
        Ok(operations)
    }

    fn persist(&self, operations: &[QueuedOperation]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = conn
            .transaction()
            .db_context("Failed to start queue persist")?;
        tx.execute(DELETE_RECORDS, [])
            .db_context("Failed to clear queue table")?;
        for op in operations {
            let record = serde_json::to_string(op)?;
            tx.execute(
                INSERT_RECORD,
                params![op.id, record, op.enqueued_at.to_string()],
            )
            .db_context("Failed to persist queued operation")?;
        }
        tx.commit().db_context("Failed to commit queue persist")
    }
}
