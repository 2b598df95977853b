//! Parameter structures for cadence operations.
//!
//! Shared parameter structures used across interfaces (CLI, queued
//! operations, future machine interfaces) without framework-specific derives.
//! Interface layers wrap these with their own derives and convert via
//! `From`/`Into`, keeping the core free of CLI concerns.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CadenceError, Result};
use crate::models::{ItemKind, OperationKind, Priority, Tier};

/// A contiguous date window belonging to one subject.
///
/// Used on its own for publish/approve/discard and embedded (flattened) in
/// the fetch and overwrite parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Window {
    /// Subject the window belongs to
    pub subject_id: i64,
    /// First day of the window (inclusive)
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub start: Date,
    /// Number of days in the window (7 for weekly, 28 for monthly)
    pub days: i32,
}

impl Window {
    /// Validates the window shape before any storage work happens.
    pub fn validate(&self) -> Result<()> {
        if self.days <= 0 {
            return Err(CadenceError::invalid_input(
                "days",
                format!("window length must be positive, got {}", self.days),
            ));
        }
        Ok(())
    }

    /// Last day of the window (inclusive).
    pub fn end(&self) -> Date {
        crate::dates::safe_add_days(self.start, i64::from(self.days - 1))
    }
}

/// Parameters for reading a window of plan items from one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct FetchWindow {
    /// The window to read
    #[serde(flatten)]
    pub window: Window,
    /// Tier to read from
    #[serde(default)]
    pub tier: Tier,
}

/// An item to be written into the draft tier. The id and approval flag are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct NewPlanItem {
    /// Calendar day the item is scheduled on
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    pub for_date: Date,
    /// Kind of scheduled content
    pub kind: ItemKind,
    /// Opaque structured content
    pub payload: Value,
    /// Whether the item starts out approved (normally false)
    #[serde(default)]
    pub is_approved: bool,
}

/// Parameters for replacing the draft items of a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OverwriteWindow {
    /// The window to overwrite
    #[serde(flatten)]
    pub window: Window,
    /// Replacement draft items; every `for_date` must fall inside the window
    pub items: Vec<NewPlanItem>,
}

impl OverwriteWindow {
    /// Validates the window and that every item falls inside it.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()?;
        let end = self.window.end();
        for item in &self.items {
            if item.for_date < self.window.start || item.for_date > end {
                return Err(CadenceError::invalid_input(
                    "items",
                    format!(
                        "item dated {} falls outside the window {}..={}",
                        item.for_date, self.window.start, end
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn default_max_retries() -> u32 {
    3
}

/// Parameters for enqueuing an operation into the offline queue. The id,
/// timestamp, and retry counter are assigned by the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct NewOperation {
    /// Kind of mutating request
    pub kind: OperationKind,
    /// Operation payload, interpreted by the sync executor
    pub data: Value,
    /// Replay priority
    #[serde(default)]
    pub priority: Priority,
    /// Maximum attempts before the operation is dropped
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_window_validate_rejects_non_positive_days() {
        for days in [0, -1, -28] {
            let window = Window {
                subject_id: 1,
                start: date(2025, 3, 3),
                days,
            };
            assert!(matches!(
                window.validate(),
                Err(CadenceError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_window_end_is_inclusive() {
        let window = Window {
            subject_id: 1,
            start: date(2025, 3, 3),
            days: 7,
        };
        assert!(window.validate().is_ok());
        assert_eq!(window.end(), date(2025, 3, 9));
    }

    #[test]
    fn test_overwrite_rejects_items_outside_window() {
        let params = OverwriteWindow {
            window: Window {
                subject_id: 1,
                start: date(2025, 3, 3),
                days: 7,
            },
            items: vec![NewPlanItem {
                for_date: date(2025, 3, 10),
                kind: ItemKind::Meal,
                payload: json!({}),
                is_approved: false,
            }],
        };
        assert!(matches!(
            params.validate(),
            Err(CadenceError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_new_operation_defaults() {
        let raw = json!({
            "kind": "save",
            "data": {"subject_id": 1}
        });
        let op: NewOperation = serde_json::from_value(raw).unwrap();
        assert_eq!(op.priority, Priority::Normal);
        assert_eq!(op.max_retries, 3);
    }

    #[cfg(feature = "schema")]
    #[test]
    fn test_params_generate_json_schemas() {
        let schema = serde_json::to_string(&schemars::schema_for!(OverwriteWindow)).unwrap();
        assert!(schema.contains("subject_id"));
        assert!(schema.contains("items"));

        let schema = serde_json::to_string(&schemars::schema_for!(NewOperation)).unwrap();
        assert!(schema.contains("priority"));
        assert!(schema.contains("max_retries"));

        let schema = serde_json::to_string(&schemars::schema_for!(FetchWindow)).unwrap();
        assert!(schema.contains("tier"));
    }
}
