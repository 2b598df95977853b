//! Builder for creating and configuring StagingStore instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::StagingStore;
use crate::{
    db::Database,
    error::{CadenceError, Result},
};

/// Builder for creating and configuring StagingStore instances.
#[derive(Debug, Clone)]
pub struct StagingStoreBuilder {
    database_path: Option<PathBuf>,
}

impl StagingStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/cadence/cadence.db` or `~/.local/share/cadence/cadence.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured store, creating the database and schema if they
    /// do not exist yet.
    pub async fn build(self) -> Result<StagingStore> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CadenceError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), CadenceError>(())
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(StagingStore::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file("cadence.db")
            .map_err(|e| CadenceError::XdgDirectory(e.to_string()))
    }
}

impl Default for StagingStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
