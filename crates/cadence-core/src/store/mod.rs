//! High-level staging API over the two-tier item table.
//!
//! [`StagingStore`] is the async entry point the interface layers talk to.
//! Each operation opens the database on a blocking thread, so the store
//! itself is a cheap handle that can be cloned across tasks.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`StagingStore`] instances
//! - `window_ops`: Draft-tier window reads and writes, publish and discard
//! - `status_ops`: Weekly and monthly approval status over the draft tier
//! - [`executor`]: Adapter replaying queued operations through the store

use std::path::PathBuf;

// Module declarations
pub mod builder;
pub mod executor;
mod status_ops;
mod window_ops;

// Re-export the main types
pub use builder::StagingStoreBuilder;
pub use executor::StoreExecutor;

/// Main staging interface for plan item windows.
#[derive(Clone)]
pub struct StagingStore {
    pub(crate) db_path: PathBuf,
}

impl StagingStore {
    /// Creates a new store over the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}
