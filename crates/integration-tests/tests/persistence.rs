//! Queue state survives a save/load cycle through the JSON snapshot file

use std::sync::Arc;

use queuesnip_core::application::{EnqueueRequest, QueueService};
use queuesnip_core::domain::{EntryId, EntryStatus, QueueSnapshot, ShopConfig, SNAPSHOT_VERSION};
use queuesnip_core::port::{SequentialIdProvider, SnapshotStore, SystemTimeProvider};
use queuesnip_core::AppError;
use queuesnip_infra_json::JsonSnapshotStore;

fn open_shop(config: ShopConfig) -> QueueService {
    let (catalog, roster) = config.into_parts().unwrap();
    QueueService::new(
        catalog,
        roster,
        Arc::new(SequentialIdProvider::new()),
        Arc::new(SystemTimeProvider),
    )
}

#[tokio::test]
async fn test_restart_keeps_queue_and_numbering() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("queue.json"));

    let before = open_shop(ShopConfig::default());
    let amy = before.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();
    let ben = before
        .enqueue(EnqueueRequest::new("Ben", 1, "shave").with_phone("555-0199"))
        .unwrap();
    let cal = before.enqueue(EnqueueRequest::new("Cal", 2, "styling")).unwrap();
    before.start_service(1).unwrap();
    before.dequeue_completed(cal.id).unwrap();
    before.set_barber_active(2, false).unwrap();
    store.save(&before.snapshot().unwrap()).await.unwrap();

    let after = open_shop(ShopConfig::default());
    let report = after.restore(store.load().await.unwrap().unwrap()).unwrap();

    assert_eq!(report.restored, 2);
    assert_eq!(after.list_for_barber(1).unwrap(), before.list_for_barber(1).unwrap());
    assert_eq!(after.current_client(1).unwrap().unwrap().status, EntryStatus::InService);
    assert_eq!(after.wait_for_entry(ben.id).unwrap().minutes, 30);
    assert!(!after.barber(2).unwrap().unwrap().active);

    // Cal's completed ticket is not handed out again
    let dee = after.enqueue(EnqueueRequest::new("Dee", 1, "shave")).unwrap();
    assert_eq!(dee.id, EntryId::new(4));
    assert!(dee.joined_at >= amy.joined_at);
}

#[tokio::test]
async fn test_reconfigured_shop_drops_lines_of_removed_barbers() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("queue.json"));

    let before = open_shop(ShopConfig::default());
    before.enqueue(EnqueueRequest::new("Amy", 1, "haircut")).unwrap();
    before.enqueue(EnqueueRequest::new("Ben", 2, "haircut")).unwrap();
    store.save(&before.snapshot().unwrap()).await.unwrap();

    let mut smaller = ShopConfig::default();
    smaller.barbers.retain(|b| b.id != 2);
    smaller.services.retain(|s| s.id != "haircut");

    let after = open_shop(smaller);
    let report = after.restore(store.load().await.unwrap().unwrap()).unwrap();

    assert_eq!(report.restored, 1);
    assert_eq!(report.dropped_unknown_barber, 1);
    assert_eq!(report.unknown_service, 1);

    // Amy's haircut is gone from the catalog; the default duration applies
    assert_eq!(after.preview(1).unwrap().minutes, 30);
    assert_eq!(after.board().unwrap()[0].rows[0].service_name, None);
}

#[tokio::test]
async fn test_snapshot_from_newer_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.json");

    let mut future = QueueSnapshot::empty(0);
    future.version = SNAPSHOT_VERSION + 1;
    std::fs::write(&path, serde_json::to_vec(&future).unwrap()).unwrap();

    let loaded = JsonSnapshotStore::new(path).load().await.unwrap().unwrap();
    let shop = open_shop(ShopConfig::default());

    assert!(shop.restore(loaded).is_err());
}

#[tokio::test]
async fn test_unreadable_state_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queue.json");
    std::fs::write(&path, "[]").unwrap();

    let err = JsonSnapshotStore::new(path).load().await.unwrap_err();
    assert!(matches!(err, AppError::Serialization(_)));
}
