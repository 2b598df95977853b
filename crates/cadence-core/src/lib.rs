//! Core library for the Cadence staged-plan coaching backend.
//!
//! This crate provides the staging and reliable-write layer for calendar
//! plans: a two-tier (draft/published) item store, pure approval status
//! computation, defensive calendar-day arithmetic, request deduplication for
//! concurrent callers, and an offline operation queue that replays mutations
//! when connectivity returns.
//!
//! # Architecture
//!
//! - **Dates** ([`dates`]): every date-like input is normalized to a UTC
//!   calendar day exactly once, at the validation boundary; everything
//!   downstream compares days, not timestamps.
//! - **Status** ([`status`]): one pure function classifies any window of
//!   items, shared by the weekly and the monthly views so they can never
//!   disagree.
//! - **Store** ([`store`]): async facade over the SQLite-backed two-tier
//!   table; publish replaces the published copy of a window atomically.
//! - **Dedup** ([`dedup`]): concurrent identical requests join one in-flight
//!   execution instead of each hitting the store.
//! - **Queue** ([`queue`]): durable buffer for mutations made while offline,
//!   replayed sequentially by priority with a bounded per-operation retry
//!   budget.
//!
//! # Quick Start
//!
//! ```rust
//! use cadence_core::{StagingStoreBuilder, params::{NewPlanItem, OverwriteWindow, Window}};
//! use cadence_core::models::ItemKind;
//! use jiff::civil::date;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StagingStoreBuilder::new()
//!     .with_database_path(Some("cadence.db"))
//!     .build()
//!     .await?;
//!
//! let window = Window {
//!     subject_id: 1,
//!     start: date(2025, 3, 3),
//!     days: 7,
//! };
//! store
//!     .overwrite_window(&OverwriteWindow {
//!         window,
//!         items: vec![NewPlanItem {
//!             for_date: date(2025, 3, 3),
//!             kind: ItemKind::Meal,
//!             payload: serde_json::json!({"calories": 600}),
//!             is_approved: false,
//!         }],
//!     })
//!     .await?;
//!
//! let weekly = store.weekly_status(1, date(2025, 3, 3)).await?;
//! println!("{}", weekly.status);
//! # Ok(())
//! # }
//! ```

pub mod dates;
pub mod db;
pub mod dedup;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod queue;
pub mod status;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use dedup::{dedup_key, ExecuteOptions, RequestDeduplicator};
pub use display::{LocalDateTime, MonthlyReport, PlanItems, QueueReport, WeeklyReport};
pub use error::{CadenceError, Result};
pub use models::{
    ApprovalStatus, ItemKind, MonthlyStatus, OperationKind, PlanItem, Priority, QueueState,
    QueuedOperation, TerminalFailure, Tier, WeeklyStatus,
};
pub use params::{FetchWindow, NewOperation, NewPlanItem, OverwriteWindow, Window};
pub use queue::{
    MemoryStorage, OfflineOperationQueue, QueueStorage, SqliteStorage, SyncExecutor, SyncReport,
};
pub use store::{StagingStore, StagingStoreBuilder, StoreExecutor};
