//! Local-first inventory persistence with best-effort remote sync.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use stocksnap_inventory::InventoryItem;

use crate::blob::BlobStore;
use crate::config::SyncConfig;
use crate::error::{StoreError, SyncError};
use crate::offline::SyncStatus;
use crate::remote::RemoteInventory;
use crate::snapshot::{normalize_snapshot, parse_snapshot};

/// Blob key of the inventory snapshot.
pub const INVENTORY_KEY: &str = "stocksnap_inventory_v1";
/// Blob key of the stored [`SyncConfig`].
pub const CONFIG_KEY: &str = "stocksnap_sync_config";

/// Result of a background poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A save was still being pushed; the poll result was discarded.
    Skipped,
    Refreshed(Vec<InventoryItem>),
}

/// What a guarded remote pull ended up doing.
enum Pull {
    /// Remote copy fetched and written to the local cache.
    Replaced(Vec<InventoryItem>),
    /// A push was in flight, before or after the fetch; local cache untouched.
    PushPending,
    /// Fetch failed; local cache untouched.
    Failed,
}

#[derive(Debug, Clone, Default)]
struct ConfigOverrides {
    server_url: Option<String>,
    api_key: Option<String>,
}

/// Decrements the in-flight push count when the push task ends, however it ends.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bookkeeping shared by every clone of a store.
#[derive(Default)]
struct SyncState {
    status: Mutex<SyncStatus>,
    /// Pushes spawned and not yet finished.
    pending: Arc<AtomicUsize>,
    /// Sequence number of the most recent save.
    latest_save: AtomicU64,
    /// Held while writing the local cache together with the pending count, so
    /// a pull never overwrites a save that started during its fetch.
    local: Mutex<()>,
    /// Held across `RemoteInventory::push`; pushes reach the remote in save order.
    push: Mutex<()>,
}

/// Inventory snapshot store.
///
/// The local blob is the baseline. When sync is active, a successful remote
/// fetch replaces it wholesale; a failed one is logged and the local copy is
/// served instead. While a save is still being pushed the remote copy is
/// stale, so pulls are skipped. Callers serialize load → mutate → save.
#[derive(Clone)]
pub struct InventoryStore {
    blobs: Arc<dyn BlobStore>,
    remote: Option<Arc<dyn RemoteInventory>>,
    overrides: ConfigOverrides,
    sync: Arc<SyncState>,
}

impl InventoryStore {
    /// Local-only store.
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            remote: None,
            overrides: ConfigOverrides::default(),
            sync: Arc::new(SyncState::default()),
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteInventory>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Overrides applied on top of the stored config on every read; never persisted.
    pub fn with_config_overrides(mut self, server_url: Option<String>, api_key: Option<String>) -> Self {
        self.overrides = ConfigOverrides { server_url, api_key };
        self
    }

    /// Effective sync config. Missing or unreadable config means sync is off.
    pub async fn sync_config(&self) -> Result<SyncConfig, StoreError> {
        let stored = match self.blobs.get(CONFIG_KEY).await? {
            Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "stored sync config is unreadable, using defaults");
                SyncConfig::default()
            }),
            None => SyncConfig::default(),
        };

        let ConfigOverrides { server_url, api_key } = self.overrides.clone();
        Ok(stored.with_overrides(server_url, api_key))
    }

    pub async fn save_sync_config(&self, config: &SyncConfig) -> Result<(), StoreError> {
        let text =
            serde_json::to_string(config).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.blobs.put(CONFIG_KEY, &text).await
    }

    /// Local snapshot only, normalized.
    pub async fn load_local(&self) -> Result<Vec<InventoryItem>, StoreError> {
        match self.blobs.get(INVENTORY_KEY).await? {
            Some(text) => parse_snapshot(&text).map_err(|e| StoreError::Corrupt(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Current inventory: the remote snapshot when it can be fetched and no
    /// save is still being pushed, the local cache otherwise.
    pub async fn load(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let config = self.sync_config().await?;
        let Some(remote) = self.active_remote(&config) else {
            return self.load_local().await;
        };

        match self.guarded_pull(remote.as_ref(), &config).await? {
            Pull::Replaced(items) => {
                tracing::info!(items = items.len(), "loaded inventory from remote");
                Ok(items)
            }
            Pull::PushPending | Pull::Failed => self.load_local().await,
        }
    }

    /// Persist locally, then push to the remote in the background.
    ///
    /// Pushes run one at a time in save order; a push whose snapshot was
    /// superseded by a later save before it got its turn is dropped. The
    /// returned handle completes when the push does; dropping it does not
    /// cancel the push. Push failures are logged only.
    pub async fn save(&self, items: &[InventoryItem]) -> Result<Option<JoinHandle<()>>, StoreError> {
        let config = self.sync_config().await?;
        let Some(remote) = self.active_remote(&config) else {
            let _local = self.sync.local.lock().await;
            self.write_local(items).await?;
            return Ok(None);
        };

        let seq = {
            let _local = self.sync.local.lock().await;
            self.write_local(items).await?;
            self.sync.pending.fetch_add(1, Ordering::SeqCst);
            self.sync.latest_save.fetch_add(1, Ordering::SeqCst) + 1
        };

        let guard = PendingGuard(self.sync.pending.clone());
        let sync = self.sync.clone();
        let items = items.to_vec();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            let _turn = sync.push.lock().await;

            if sync.latest_save.load(Ordering::SeqCst) != seq {
                tracing::debug!(seq, "newer save queued, dropping superseded push");
                return;
            }

            match remote.push(&config, &items).await {
                Ok(()) => {
                    sync.status.lock().await.set_online();
                    tracing::debug!(seq, items = items.len(), "pushed inventory to remote");
                }
                Err(err) => {
                    sync.status.lock().await.set_offline(err.to_string());
                    tracing::warn!(seq, error = %err, "background push to remote failed");
                }
            }
        });

        Ok(Some(handle))
    }

    /// Poll the remote. Skipped while a save is still being pushed so a stale
    /// remote copy never overwrites newer local edits.
    pub async fn refresh(&self) -> Result<RefreshOutcome, StoreError> {
        let config = self.sync_config().await?;
        let Some(remote) = self.active_remote(&config) else {
            return Ok(RefreshOutcome::Refreshed(self.load_local().await?));
        };

        match self.guarded_pull(remote.as_ref(), &config).await? {
            Pull::Replaced(items) => Ok(RefreshOutcome::Refreshed(items)),
            Pull::PushPending => Ok(RefreshOutcome::Skipped),
            Pull::Failed => Ok(RefreshOutcome::Refreshed(self.load_local().await?)),
        }
    }

    pub async fn status(&self) -> SyncStatus {
        self.sync.status.lock().await.clone()
    }

    pub fn has_pending_push(&self) -> bool {
        self.sync.pending.load(Ordering::SeqCst) > 0
    }

    fn active_remote(&self, config: &SyncConfig) -> Option<Arc<dyn RemoteInventory>> {
        if config.is_active() {
            self.remote.clone()
        } else {
            None
        }
    }

    /// Fetch the remote copy and make it the local cache, unless a push is in
    /// flight before the fetch starts or by the time it returns.
    async fn guarded_pull(
        &self,
        remote: &dyn RemoteInventory,
        config: &SyncConfig,
    ) -> Result<Pull, StoreError> {
        if self.has_pending_push() {
            tracing::debug!("save in flight, serving local cache");
            return Ok(Pull::PushPending);
        }

        let items = match self.pull(remote, config).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, "remote fetch failed, using local cache");
                return Ok(Pull::Failed);
            }
        };

        let _local = self.sync.local.lock().await;
        if self.has_pending_push() {
            tracing::debug!("save started during fetch, discarding remote copy");
            return Ok(Pull::PushPending);
        }
        self.write_local(&items).await?;
        Ok(Pull::Replaced(items))
    }

    async fn pull(
        &self,
        remote: &dyn RemoteInventory,
        config: &SyncConfig,
    ) -> Result<Vec<InventoryItem>, SyncError> {
        let result = match remote.fetch(config).await {
            Ok(value) => normalize_snapshot(value).map_err(|e| SyncError::Parse(e.to_string())),
            Err(err) => Err(err),
        };

        let mut status = self.sync.status.lock().await;
        match &result {
            Ok(_) => status.set_online(),
            Err(err) => status.set_offline(err.to_string()),
        }
        result
    }

    async fn write_local(&self, items: &[InventoryItem]) -> Result<(), StoreError> {
        let text = serde_json::to_string(items).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.blobs.put(INVENTORY_KEY, &text).await
    }
}
