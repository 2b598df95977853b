//! Display formatting functions and wrapper types.
//!
//! Domain models carry their own `Display` implementations; this module adds
//! newtype wrappers for collections and reports so every output context
//! (terminal lists, status summaries, queue inspection) goes through the
//! same formatting logic and handles empty collections gracefully.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (PlanItems)
//! - [`reports`]: Status and queue report wrappers
//! - [`datetime`]: Date/time formatting utilities

pub mod collections;
pub mod datetime;
pub mod reports;

pub use collections::PlanItems;
pub use datetime::LocalDateTime;
pub use reports::{MonthlyReport, QueueReport, WeeklyReport};
