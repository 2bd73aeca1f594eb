//! `stocksnap-store`
//!
//! **Responsibility:** persistence of the inventory snapshot.
//!
//! This crate provides:
//! - A key/value blob store (SQLite-backed, or in-memory for tests)
//! - Sync configuration stored alongside the snapshot
//! - A remote inventory client (HTTP, optional bearer token)
//! - [`InventoryStore`]: local-first load/save with best-effort remote sync
//!
//! The local cache is always the baseline. A successful remote fetch replaces
//! it wholesale; any remote failure falls back to it silently.

pub mod blob;
pub mod config;
pub mod error;
pub mod offline;
pub mod remote;
pub mod snapshot;
pub mod store;

pub use blob::{BlobStore, InMemoryBlobStore, SqliteBlobStore};
pub use config::SyncConfig;
pub use error::{StoreError, SyncError};
pub use offline::{ConnectivityState, SyncStatus};
pub use remote::{HttpRemote, RemoteInventory};
pub use snapshot::{SnapshotError, normalize_snapshot, parse_snapshot};
pub use store::{CONFIG_KEY, INVENTORY_KEY, InventoryStore, RefreshOutcome};
