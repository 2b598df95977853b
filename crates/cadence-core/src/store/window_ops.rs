//! Window operations for the StagingStore.

use tokio::task;

use super::StagingStore;
use crate::{
    db::Database,
    error::{CadenceError, Result},
    models::PlanItem,
    params::{FetchWindow, OverwriteWindow, Window},
};

impl StagingStore {
    /// Retrieves the items of a window from one tier, ordered by day then id.
    pub async fn fetch_window(&self, params: &FetchWindow) -> Result<Vec<PlanItem>> {
        params.window.validate()?;
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.fetch_window(&params.window, params.tier)
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Replaces the draft items of a window atomically and returns the
    /// inserted items with their assigned ids.
    pub async fn overwrite_window(&self, params: &OverwriteWindow) -> Result<Vec<PlanItem>> {
        params.validate()?;
        let db_path = self.db_path.clone();
        let params = params.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.overwrite_window(&params)
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Marks every draft item of a window approved without publishing it.
    /// Returns the number of items updated.
    pub async fn approve_window(&self, window: &Window) -> Result<usize> {
        window.validate()?;
        let db_path = self.db_path.clone();
        let window = *window;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.approve_window(&window)
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Publishes a window: approves the drafts and replaces the published
    /// copy in one transaction. Returns the number of items published.
    pub async fn publish_window(&self, window: &Window) -> Result<usize> {
        window.validate()?;
        let db_path = self.db_path.clone();
        let window = *window;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.publish_window(&window)
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Deletes the draft items of a window, leaving the published copy
    /// untouched. Returns the number of items removed.
    pub async fn discard_window(&self, window: &Window) -> Result<usize> {
        window.validate()?;
        let db_path = self.db_path.clone();
        let window = *window;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.discard_window(&window)
        })
        .await
        .map_err(|e| CadenceError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
