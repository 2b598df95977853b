mod common;

use cadence_core::params::{NewOperation, NewPlanItem, OverwriteWindow, Window};
use cadence_core::{
    ApprovalStatus, FetchWindow, ItemKind, OfflineOperationQueue, OperationKind, Priority,
    SqliteStorage, StoreExecutor, Tier,
};
use jiff::civil::date;
use serde_json::json;

fn week_window(subject_id: i64) -> Window {
    Window {
        subject_id,
        start: date(2025, 3, 3),
        days: 7,
    }
}

fn save_operation(window: Window) -> NewOperation {
    let params = OverwriteWindow {
        window,
        items: vec![NewPlanItem {
            for_date: date(2025, 3, 3),
            kind: ItemKind::Workout,
            payload: json!({"sets": 3}),
            is_approved: false,
        }],
    };
    NewOperation {
        kind: OperationKind::Save,
        data: serde_json::to_value(&params).expect("Failed to serialize save payload"),
        priority: Priority::Normal,
        max_retries: 3,
    }
}

fn approve_operation(window: Window) -> NewOperation {
    NewOperation {
        kind: OperationKind::Approve,
        data: serde_json::to_value(window).expect("Failed to serialize approve payload"),
        priority: Priority::Normal,
        max_retries: 3,
    }
}

#[tokio::test]
async fn test_offline_writes_replay_into_store() {
    let (temp_dir, store) = common::create_test_store().await;
    let storage = SqliteStorage::open(&temp_dir.path().join("queue.db"))
        .expect("Failed to open queue storage");
    let queue = OfflineOperationQueue::new(
        Box::new(storage),
        Box::new(StoreExecutor::new(store.clone())),
    );

    let window = week_window(1);
    queue.set_online(false).await;
    queue.enqueue(save_operation(window));
    queue.enqueue(approve_operation(window));

    // Nothing has reached the store yet.
    let drafts = store
        .fetch_window(&FetchWindow {
            window,
            tier: Tier::Draft,
        })
        .await
        .unwrap();
    assert!(drafts.is_empty());

    // Coming back online replays save before approve (enqueue order).
    let report = queue.set_online(true).await;
    assert_eq!(report.succeeded, 2);
    assert!(queue.state().operations.is_empty());

    let weekly = store.weekly_status(1, date(2025, 3, 3)).await.unwrap();
    assert_eq!(weekly.status, ApprovalStatus::Approved);

    let published = store
        .fetch_window(&FetchWindow {
            window,
            tier: Tier::Published,
        })
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
}

#[tokio::test]
async fn test_malformed_payload_is_dropped_as_terminal() {
    let (_temp_dir, store) = common::create_test_store().await;
    let queue = OfflineOperationQueue::new(
        Box::new(cadence_core::MemoryStorage::new()),
        Box::new(StoreExecutor::new(store)),
    );

    queue.set_online(false).await;
    queue.enqueue(NewOperation {
        kind: OperationKind::Approve,
        data: json!({"bogus": true}),
        priority: Priority::Normal,
        max_retries: 3,
    });

    let report = queue.set_online(true).await;
    assert_eq!(report.dropped, 1);
    assert_eq!(report.retried, 0);

    let state = queue.state();
    assert!(state.operations.is_empty());
    assert_eq!(state.terminal_failures.len(), 1);
    assert_eq!(state.terminal_failures[0].attempts, 1);
}

#[tokio::test]
async fn test_pending_operations_survive_process_restart() {
    let (temp_dir, store) = common::create_test_store().await;
    let queue_path = temp_dir.path().join("queue.db");
    let window = week_window(2);

    {
        let storage = SqliteStorage::open(&queue_path).unwrap();
        let queue = OfflineOperationQueue::new(
            Box::new(storage),
            Box::new(StoreExecutor::new(store.clone())),
        );
        queue.set_online(false).await;
        queue.enqueue(save_operation(window));
    }

    // A fresh process picks up where the last one stopped.
    let storage = SqliteStorage::open(&queue_path).unwrap();
    let queue =
        OfflineOperationQueue::new(Box::new(storage), Box::new(StoreExecutor::new(store.clone())));
    assert_eq!(queue.state().operations.len(), 1);

    let report = queue.sync().await;
    assert_eq!(report.succeeded, 1);

    let drafts = store
        .fetch_window(&FetchWindow {
            window,
            tier: Tier::Draft,
        })
        .await
        .unwrap();
    assert_eq!(drafts.len(), 1);
}
