//! Error types for the staging and reliable-write library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all cadence operations.
#[derive(Error, Debug)]
pub enum CadenceError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Invalid input validation errors (bad dates, negative windows).
    /// Never retried; surfaced immediately.
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Transient network failures. Retried per queue policy.
    #[error("Network error: {message}")]
    Network { message: String },
    /// The server rejected a write due to concurrent modification.
    /// Not retried automatically; surfaced for manual resolution.
    #[error("Write conflict: {message}")]
    Conflict { message: String },
    /// A queued operation was dropped after exhausting its retry budget.
    #[error("Operation '{operation_id}' dropped after {attempts} failed attempts")]
    ExhaustedRetries { operation_id: String, attempts: u32 },
    /// An in-flight deduplicated request was cancelled before it settled.
    #[error("Request '{key}' was cancelled")]
    Cancelled { key: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CadenceError {
    /// Creates an input validation error for a named field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a database error with additional context.
    pub fn database_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Database {
            message: message.to_string(),
            source,
        }
    }

    /// Whether the queue may replay an operation that failed with this error.
    ///
    /// Only transient network failures are retryable. Conflicts and
    /// validation failures repeat deterministically, so replaying them
    /// would burn the retry budget for nothing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CadenceError::Network { .. })
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| CadenceError::database_error(message, e))
    }
}

/// Result type alias for cadence operations
pub type Result<T> = std::result::Result<T, CadenceError>;
