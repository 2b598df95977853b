//! Approval status enumerations and per-window status summaries.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Derived approval classification of a window of plan items.
///
/// Never stored: always recomputed from the current item set by
/// [`crate::status::window_status`], so it cannot drift out of sync with the
/// data it describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// No items exist in the window yet
    #[default]
    Pending,

    /// Items exist but no day is fully approved
    NotApproved,

    /// Some days are fully approved, others are not
    PartialApproved,

    /// Every day that has items is fully approved
    Approved,
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "not_approved" | "notapproved" => Ok(ApprovalStatus::NotApproved),
            "partial_approved" | "partialapproved" => Ok(ApprovalStatus::PartialApproved),
            "approved" => Ok(ApprovalStatus::Approved),
            _ => Err(format!("Invalid approval status: {s}")),
        }
    }
}

impl ApprovalStatus {
    /// Convert to string representation used on the wire and in displays.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::NotApproved => "not_approved",
            ApprovalStatus::PartialApproved => "partial_approved",
            ApprovalStatus::Approved => "approved",
        }
    }

    /// Get status with consistent icon formatting for display.
    pub fn with_icon(&self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "✓ Approved",
            ApprovalStatus::PartialApproved => "◐ Partially Approved",
            ApprovalStatus::NotApproved => "○ Not Approved",
            ApprovalStatus::Pending => "· Pending",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one 7-day sub-window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyStatus {
    /// 1-based week number within the containing window
    pub week: u8,

    /// Derived status of this week
    pub status: ApprovalStatus,

    /// First day of the week (inclusive)
    pub start: Date,

    /// Last day of the week (inclusive)
    pub end: Date,

    /// Number of plan items present in the week
    pub item_count: usize,
}

/// Status of a 28-day window with its per-week breakdown.
///
/// The per-week statuses are computed with the same function the weekly view
/// uses, so the two views always agree on any shared 7-day sub-window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyStatus {
    /// Rolled-up status across all four weeks
    pub overall: ApprovalStatus,

    /// Per-week breakdown, weeks 1 through 4
    pub weeks: Vec<WeeklyStatus>,
}
