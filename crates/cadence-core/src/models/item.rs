//! Plan item model and its classification enums.

use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of scheduled content a plan item carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A meal entry in a nutrition plan
    Meal,

    /// A workout entry in a fitness plan
    Workout,

    /// Any other scheduled content
    Custom,
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "meal" => Ok(ItemKind::Meal),
            "workout" => Ok(ItemKind::Workout),
            "custom" => Ok(ItemKind::Custom),
            _ => Err(format!("Invalid item kind: {s}")),
        }
    }
}

impl ItemKind {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Meal => "meal",
            ItemKind::Workout => "workout",
            ItemKind::Custom => "custom",
        }
    }
}

/// Storage tier a plan item lives in.
///
/// The draft tier is the freely mutable, unpublished proposal. The published
/// tier holds the authoritative copy written atomically by a publish.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Mutable, unpublished proposal data
    #[default]
    Draft,

    /// Committed, authoritative data copied from an approved draft
    Published,
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Tier::Draft),
            "published" => Ok(Tier::Published),
            _ => Err(format!("Invalid tier: {s}")),
        }
    }
}

impl Tier {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Draft => "draft",
            Tier::Published => "published",
        }
    }
}

/// A single scheduled item for one subject on one calendar day.
///
/// Multiple items may share the same `for_date` (several meals per day, a
/// workout plus a meal, and so on). Approval is tracked per item but always
/// evaluated per day: a day counts as approved only when every one of its
/// items is approved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanItem {
    /// Unique identifier for the item (0 until persisted)
    pub id: u64,

    /// Subject (client) the item is scheduled for
    pub subject_id: i64,

    /// Calendar day the item is scheduled on (no time component)
    pub for_date: Date,

    /// Kind of scheduled content
    pub kind: ItemKind,

    /// Opaque structured content (exercises, meal details, ...)
    pub payload: Value,

    /// Whether this item has been approved
    pub is_approved: bool,
}

impl fmt::Display for PlanItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} for subject {} ({})",
            self.for_date,
            self.kind.as_str(),
            self.subject_id,
            if self.is_approved { "approved" } else { "unapproved" },
        )
    }
}
