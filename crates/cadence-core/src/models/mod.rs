//! Data models for plan items, approval statuses, and queued operations.
//!
//! This module contains the core domain models of the staging system. The
//! central rule they encode: a [`PlanItem`] is the unit of storage, the
//! calendar day is the unit of approval, and an [`ApprovalStatus`] is always
//! derived from the current item set rather than stored.

mod item;
mod queue;
mod status;

#[cfg(test)]
mod tests;

pub use item::{ItemKind, PlanItem, Tier};
pub use queue::{
    OperationKind, Priority, QueueState, QueuedOperation, TerminalFailure,
};
pub use status::{ApprovalStatus, MonthlyStatus, WeeklyStatus};
