//! Tests for the model types.

use std::str::FromStr;

use jiff::Timestamp;
use serde_json::json;

use super::*;

#[test]
fn test_item_kind_round_trip() {
    for kind in [ItemKind::Meal, ItemKind::Workout, ItemKind::Custom] {
        assert_eq!(ItemKind::from_str(kind.as_str()).unwrap(), kind);
    }
    assert!(ItemKind::from_str("snack").is_err());
}

#[test]
fn test_tier_round_trip() {
    assert_eq!(Tier::from_str("draft").unwrap(), Tier::Draft);
    assert_eq!(Tier::from_str("published").unwrap(), Tier::Published);
    assert_eq!(Tier::default(), Tier::Draft);
    assert!(Tier::from_str("archive").is_err());
}

#[test]
fn test_approval_status_round_trip() {
    for status in [
        ApprovalStatus::Pending,
        ApprovalStatus::NotApproved,
        ApprovalStatus::PartialApproved,
        ApprovalStatus::Approved,
    ] {
        assert_eq!(ApprovalStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert!(ApprovalStatus::from_str("maybe").is_err());
}

#[test]
fn test_priority_sort_order() {
    let mut priorities = vec![
        Priority::Low,
        Priority::Critical,
        Priority::Normal,
        Priority::High,
    ];
    priorities.sort();
    assert_eq!(
        priorities,
        vec![
            Priority::Critical,
            Priority::High,
            Priority::Normal,
            Priority::Low,
        ]
    );
}

#[test]
fn test_queued_operation_serde_defaults() {
    // Persisted records from before the retry_count/priority fields existed
    // must still deserialize.
    let raw = json!({
        "id": "op_1",
        "kind": "save",
        "data": {"subject_id": 7},
        "enqueued_at": "2025-03-01T10:00:00Z",
        "max_retries": 3
    });

    let op: QueuedOperation = serde_json::from_value(raw).expect("should deserialize");
    assert_eq!(op.retry_count, 0);
    assert_eq!(op.priority, Priority::Normal);
    assert_eq!(op.kind, OperationKind::Save);
    assert_eq!(
        op.enqueued_at,
        "2025-03-01T10:00:00Z".parse::<Timestamp>().unwrap()
    );
}

#[test]
fn test_queued_operation_round_trip() {
    let op = QueuedOperation {
        id: "op_42".to_string(),
        kind: OperationKind::Approve,
        data: json!({"subject_id": 3, "start": "2025-03-03", "days": 7}),
        enqueued_at: Timestamp::now(),
        retry_count: 1,
        max_retries: 5,
        priority: Priority::Critical,
    };

    let encoded = serde_json::to_string(&op).expect("should serialize");
    let decoded: QueuedOperation = serde_json::from_str(&encoded).expect("should deserialize");
    assert_eq!(decoded, op);
}
