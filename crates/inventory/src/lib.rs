//! Inventory domain module: stock levels, the per-item history ledger, and
//! reconciliation of scanned usage lists.
//!
//! This crate contains business rules implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage). Time and identifiers are
//! injected through [`stocksnap_core::Clock`] and [`stocksnap_core::IdGenerator`].

pub mod insights;
pub mod item;
pub mod ledger;
pub mod manual;
pub mod matcher;
pub mod reconcile;
pub mod review;
pub mod scan;
pub mod view;

pub use insights::{CategoryHealth, category_health, history_newest_first, low_stock_alerts, trend_series};
pub use item::{Category, HistoryEntry, HistoryReason, InventoryItem};
pub use ledger::{Ledger, append};
pub use manual::{ItemDraft, apply_manual_edits, seed_from_scans};
pub use matcher::{find_match, find_match_index};
pub use reconcile::{
    ReconcileOptions, ReconcileOutcome, Reconciler, Underflow, UnderflowPolicy, reconcile,
};
pub use review::{ScanPreview, preview_scans};
pub use scan::{Confidence, ScanGuess};
pub use view::{SortDirection, SortField, project};
