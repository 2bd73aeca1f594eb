//! End-to-end flows: load → reconcile → save against SQLite and a fake remote.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use tokio::sync::Semaphore;

use stocksnap_core::{FixedClock, SequentialIds};
use stocksnap_inventory::{
    Category, HistoryReason, InventoryItem, ItemDraft, Reconciler, ScanGuess, apply_manual_edits,
};
use stocksnap_store::{
    BlobStore, ConnectivityState, INVENTORY_KEY, InventoryStore, RefreshOutcome, RemoteInventory,
    SqliteBlobStore, SyncConfig, SyncError,
};

/// Remote double: serves its current snapshot (the last pushed one once a
/// push lands), can fail fetches, records pushes, and can hold pushes until
/// permits are added to its gate.
#[derive(Default)]
struct FakeRemote {
    snapshot: Mutex<Option<JsonValue>>,
    /// Answer fetches with this HTTP status instead of the snapshot.
    outage: Option<u16>,
    fail_push: bool,
    pushed: Mutex<Vec<Vec<InventoryItem>>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeRemote {
    fn serving(snapshot: JsonValue) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    fn unreachable() -> Self {
        Self::default()
    }

    /// Serves `snapshot`, but every push waits for a permit on the returned gate.
    fn gated(snapshot: JsonValue) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let remote = Self {
            gate: Some(gate.clone()),
            ..Self::serving(snapshot)
        };
        (remote, gate)
    }

    fn pushes(&self) -> Vec<Vec<InventoryItem>> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteInventory for FakeRemote {
    async fn fetch(&self, _config: &SyncConfig) -> Result<JsonValue, SyncError> {
        if let Some(status) = self.outage {
            return Err(SyncError::Api(status, "service unavailable".to_string()));
        }
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| SyncError::Network("connection refused".to_string()))
    }

    async fn push(&self, _config: &SyncConfig, items: &[InventoryItem]) -> Result<(), SyncError> {
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.map_err(|e| SyncError::Network(e.to_string()))?;
        }
        if self.fail_push {
            return Err(SyncError::Api(500, "boom".to_string()));
        }
        *self.snapshot.lock().unwrap() = Some(serde_json::to_value(items).unwrap());
        self.pushed.lock().unwrap().push(items.to_vec());
        Ok(())
    }
}

fn tea() -> InventoryItem {
    InventoryItem::create(&mut SequentialIds::new("tea"), "Tea", Category::Beverages, 1)
}

fn milk() -> InventoryItem {
    InventoryItem::create(&mut SequentialIds::new("milk"), "Milk", Category::Dairy, 2)
}

fn sync_on() -> SyncConfig {
    SyncConfig {
        enabled: true,
        server_url: "https://sync.example.test/inventory".to_string(),
        api_key: Some("token".to_string()),
        auto_sync: false,
    }
}

async fn seeded_store(blobs: Arc<SqliteBlobStore>) -> Vec<InventoryItem> {
    let store = InventoryStore::new(blobs);
    let mut ids = SequentialIds::new("seed");
    let items = apply_manual_edits(
        &[],
        vec![
            ItemDraft::new("Whole Milk", Category::Dairy, 6, 2),
            ItemDraft::new("Rice", Category::Pantry, 3, 1),
        ],
        &FixedClock(1_000),
        &mut ids,
    )
    .unwrap();
    store.save(&items).await.unwrap();
    items
}

#[tokio::test]
async fn reconcile_round_trip_through_sqlite() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    seeded_store(blobs.clone()).await;

    let store = InventoryStore::new(blobs);
    let inventory = store.load().await.unwrap();
    assert_eq!(inventory.len(), 2);

    let scans = vec![ScanGuess::new("milk", 2), ScanGuess::new("Olive Oil", 1)];
    let outcome = Reconciler::new(FixedClock(5_000), SequentialIds::new("r"))
        .run(&scans, inventory)
        .unwrap();
    assert!(store.save(&outcome.inventory).await.unwrap().is_none());

    let reloaded = store.load().await.unwrap();
    assert_eq!(reloaded, outcome.inventory);

    let milk = reloaded.iter().find(|i| i.name() == "Whole Milk").unwrap();
    assert_eq!(milk.quantity(), 4);
    assert_eq!(milk.history().last().unwrap().reason, HistoryReason::Scanned);

    let oil = reloaded.iter().find(|i| i.name() == "Olive Oil").unwrap();
    assert_eq!(oil.quantity(), 0);
    assert_eq!(oil.min_stock(), 1);
    assert_eq!(oil.history().len(), 2);
    assert!(reloaded.iter().all(InventoryItem::ledger_consistent));
}

#[tokio::test]
async fn remote_snapshot_replaces_local_cache() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    seeded_store(blobs.clone()).await;

    let remote = Arc::new(FakeRemote::serving(json!([
        {"id": 7, "name": "Coffee Beans", "category": "Beverages", "quantity": 2}
    ])));
    let store = InventoryStore::new(blobs).with_remote(remote);
    store.save_sync_config(&sync_on()).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id_typed().as_str(), "7");
    assert_eq!(loaded[0].min_stock(), 0);
    assert!(loaded[0].history().is_empty());

    assert_eq!(store.load_local().await.unwrap(), loaded);
    assert_eq!(store.status().await.state, ConnectivityState::Online);
}

#[tokio::test]
async fn unreachable_remote_falls_back_to_local() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    let seeded = seeded_store(blobs.clone()).await;

    let store = InventoryStore::new(blobs).with_remote(Arc::new(FakeRemote::unreachable()));
    store.save_sync_config(&sync_on()).await.unwrap();

    assert_eq!(store.load().await.unwrap(), seeded);
    let status = store.status().await;
    assert_eq!(status.state, ConnectivityState::Offline);
    assert!(status.last_error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn legacy_local_snapshot_is_migrated_on_load() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    blobs
        .put(
            INVENTORY_KEY,
            r#"[{"id": "1", "name": "Eggs", "category": "Dairy", "quantity": 12}]"#,
        )
        .await
        .unwrap();

    let store = InventoryStore::new(blobs);
    let items = store.load().await.unwrap();
    assert_eq!(items[0].min_stock(), 0);
    assert!(items[0].history().is_empty());
    assert_eq!(items[0].quantity(), 12);
}

#[tokio::test]
async fn error_status_from_remote_falls_back_to_local() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    let seeded = seeded_store(blobs.clone()).await;

    let remote = FakeRemote {
        outage: Some(503),
        ..FakeRemote::serving(json!([]))
    };
    let store = InventoryStore::new(blobs).with_remote(Arc::new(remote));
    store.save_sync_config(&sync_on()).await.unwrap();

    assert_eq!(store.load().await.unwrap(), seeded);
    assert_eq!(store.load_local().await.unwrap(), seeded);
    let status = store.status().await;
    assert!(status.is_offline());
    assert!(status.last_error.unwrap().contains("503"));
}

#[tokio::test]
async fn save_pushes_full_snapshot_in_background() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    let remote = Arc::new(FakeRemote::unreachable());
    let store = InventoryStore::new(blobs).with_remote(remote.clone());
    store.save_sync_config(&sync_on()).await.unwrap();

    let items = vec![tea()];
    let push = store.save(&items).await.unwrap().expect("sync is active");
    push.await.unwrap();

    assert_eq!(remote.pushes(), vec![items.clone()]);
    assert_eq!(store.load_local().await.unwrap(), items);
    assert!(!store.has_pending_push());
}

#[tokio::test]
async fn failed_push_keeps_local_save() {
    let blobs = Arc::new(SqliteBlobStore::in_memory());
    let remote = Arc::new(FakeRemote {
        fail_push: true,
        ..FakeRemote::default()
    });
    let store = InventoryStore::new(blobs).with_remote(remote.clone());
    store.save_sync_config(&sync_on()).await.unwrap();

    let items = vec![tea()];
    store.save(&items).await.unwrap().unwrap().await.unwrap();

    assert!(remote.pushes().is_empty());
    assert_eq!(store.load_local().await.unwrap(), items);
    assert!(store.status().await.is_offline());
}

#[tokio::test]
async fn load_during_push_serves_the_local_save() {
    let (remote, gate) = FakeRemote::gated(json!([]));
    let remote = Arc::new(remote);
    let store =
        InventoryStore::new(Arc::new(SqliteBlobStore::in_memory())).with_remote(remote.clone());
    store.save_sync_config(&sync_on()).await.unwrap();

    let items = vec![tea()];
    let push = store.save(&items).await.unwrap().unwrap();
    assert!(store.has_pending_push());

    // The remote still holds the empty snapshot; it must not replace the save.
    assert_eq!(store.load().await.unwrap(), items);
    assert_eq!(store.load_local().await.unwrap(), items);

    gate.add_permits(1);
    push.await.unwrap();

    assert_eq!(store.load().await.unwrap(), items);
    assert_eq!(remote.pushes(), vec![items]);
}

#[tokio::test]
async fn back_to_back_saves_reach_remote_in_order() {
    let (remote, gate) = FakeRemote::gated(json!([]));
    let remote = Arc::new(remote);
    let store =
        InventoryStore::new(Arc::new(SqliteBlobStore::in_memory())).with_remote(remote.clone());
    store.save_sync_config(&sync_on()).await.unwrap();

    let first = vec![tea()];
    let second = vec![tea(), milk()];
    let first_push = store.save(&first).await.unwrap().unwrap();
    // Let the first push take its turn and block on the gate.
    tokio::task::yield_now().await;
    let second_push = store.save(&second).await.unwrap().unwrap();

    gate.add_permits(2);
    first_push.await.unwrap();
    second_push.await.unwrap();

    assert_eq!(remote.pushes().last(), Some(&second));
    assert!(!store.has_pending_push());
    assert_eq!(store.load().await.unwrap(), second);
}

#[tokio::test]
async fn refresh_is_skipped_while_push_is_in_flight() {
    let (remote, gate) = FakeRemote::gated(json!([]));
    let store =
        InventoryStore::new(Arc::new(SqliteBlobStore::in_memory())).with_remote(Arc::new(remote));
    store.save_sync_config(&sync_on()).await.unwrap();

    let items = vec![tea()];
    let push = store.save(&items).await.unwrap().unwrap();

    assert!(store.has_pending_push());
    assert_eq!(store.refresh().await.unwrap(), RefreshOutcome::Skipped);
    assert_eq!(store.load_local().await.unwrap(), items);

    gate.add_permits(1);
    push.await.unwrap();

    // The remote now serves the pushed snapshot.
    assert_eq!(store.refresh().await.unwrap(), RefreshOutcome::Refreshed(items.clone()));
    assert_eq!(store.load_local().await.unwrap(), items);
}
