//! Reconciliation of a scanned usage list against current inventory.
//!
//! Scans are applied strictly in order over an explicit working copy of the
//! inventory (a fold), so a later scan can match an item that an earlier scan
//! in the same batch created. The whole batch is validated up front and
//! applied in memory; callers persist the returned inventory once.

use serde::{Deserialize, Serialize};

use stocksnap_core::{Clock, DomainResult, IdGenerator, ItemId, SystemClock, UuidIds};

use crate::item::{Category, HistoryReason, InventoryItem};
use crate::ledger::append;
use crate::matcher::find_match_index;
use crate::scan::ScanGuess;

/// What to do when a scan asks to remove more than is on hand.
///
/// Both policies clamp the quantity at zero and record only the actual
/// reduction; they differ in how loudly the absorbed excess is surfaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderflowPolicy {
    /// Absorb the excess quietly (debug log only).
    #[default]
    Absorb,
    /// Absorb the excess and log each occurrence as a warning.
    Report,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOptions {
    pub underflow: UnderflowPolicy,
    /// How far before the batch timestamp the synthetic `initial` entry of an
    /// inferred item is placed. Always at least 1ms.
    pub initial_offset_ms: i64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            underflow: UnderflowPolicy::Absorb,
            initial_offset_ms: 1_000,
        }
    }
}

/// A scan that asked for more than was on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Underflow {
    pub item_id: ItemId,
    pub name: String,
    pub requested: u32,
    pub removed: u32,
}

/// Result of one reconciliation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Full updated inventory; inferred items are appended at the end.
    pub inventory: Vec<InventoryItem>,
    /// Existing items each scan resolved to, in scan order (may repeat).
    pub matched: Vec<ItemId>,
    /// Items inferred from unmatched scans, in creation order.
    pub created: Vec<ItemId>,
    pub underflows: Vec<Underflow>,
}

impl ReconcileOutcome {
    fn start(inventory: Vec<InventoryItem>) -> Self {
        Self {
            inventory,
            matched: Vec::new(),
            created: Vec::new(),
            underflows: Vec::new(),
        }
    }
}

/// Reconciliation engine bound to a clock, an id source and options.
#[derive(Debug, Clone)]
pub struct Reconciler<C, G> {
    clock: C,
    ids: G,
    options: ReconcileOptions,
}

impl<C: Clock, G: IdGenerator> Reconciler<C, G> {
    pub fn new(clock: C, ids: G) -> Self {
        Self {
            clock,
            ids,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply `scans` to `inventory`.
    ///
    /// Fails without touching anything if any scan has a blank name or a zero
    /// quantity.
    pub fn run(
        &mut self,
        scans: &[ScanGuess],
        inventory: Vec<InventoryItem>,
    ) -> DomainResult<ReconcileOutcome> {
        for scan in scans {
            scan.validate()?;
        }

        if scans.is_empty() {
            return Ok(ReconcileOutcome::start(inventory));
        }

        // One logical timestamp for the whole batch.
        let timestamp = self.clock.now_millis();

        let outcome = scans
            .iter()
            .fold(ReconcileOutcome::start(inventory), |acc, scan| {
                self.apply_scan(acc, scan, timestamp)
            });

        tracing::info!(
            scans = scans.len(),
            matched = outcome.matched.len(),
            created = outcome.created.len(),
            underflows = outcome.underflows.len(),
            "reconciled scan batch"
        );

        Ok(outcome)
    }

    fn apply_scan(
        &mut self,
        mut acc: ReconcileOutcome,
        scan: &ScanGuess,
        timestamp: i64,
    ) -> ReconcileOutcome {
        match find_match_index(&scan.name, &acc.inventory) {
            Some(index) => {
                let item = acc.inventory[index].clone();
                let item_id = item.id_typed().clone();

                let (item, entry) = append(
                    item,
                    -i64::from(scan.quantity),
                    HistoryReason::Scanned,
                    timestamp,
                    &mut self.ids,
                );
                let removed = entry.map_or(0, |e| e.change.unsigned_abs() as u32);

                if removed < scan.quantity {
                    let underflow = Underflow {
                        item_id: item_id.clone(),
                        name: item.name().to_string(),
                        requested: scan.quantity,
                        removed,
                    };
                    match self.options.underflow {
                        UnderflowPolicy::Absorb => tracing::debug!(
                            item_id = %underflow.item_id,
                            requested = underflow.requested,
                            removed = underflow.removed,
                            "scan exceeded stock on hand; clamped at zero"
                        ),
                        UnderflowPolicy::Report => tracing::warn!(
                            item_id = %underflow.item_id,
                            requested = underflow.requested,
                            removed = underflow.removed,
                            "scan exceeded stock on hand; clamped at zero"
                        ),
                    }
                    acc.underflows.push(underflow);
                }

                tracing::debug!(scan = %scan.name, item_id = %item_id, removed, "scan matched item");
                acc.inventory[index] = item;
                acc.matched.push(item_id);
            }
            None => {
                let item = self.infer_item(scan, timestamp);
                tracing::debug!(scan = %scan.name, item_id = %item.id_typed(), "inferred new item from scan");
                acc.created.push(item.id_typed().clone());
                acc.inventory.push(item);
            }
        }
        acc
    }

    /// Unknown name: the scanned amount is taken as what was on hand and got
    /// used. It becomes the par, and the ledger shows it arriving just before
    /// the batch and leaving at the batch timestamp.
    fn infer_item(&mut self, scan: &ScanGuess, timestamp: i64) -> InventoryItem {
        let quantity = i64::from(scan.quantity);
        let opened_at = timestamp.saturating_sub(self.options.initial_offset_ms.max(1));

        let item = InventoryItem::create(&mut self.ids, scan.name.clone(), Category::Other, scan.quantity);
        let (item, _) = append(item, quantity, HistoryReason::Initial, opened_at, &mut self.ids);
        let (item, _) = append(item, -quantity, HistoryReason::Scanned, timestamp, &mut self.ids);
        item
    }
}

/// Reconcile with default options, the system clock and UUID identifiers.
pub fn reconcile(scans: &[ScanGuess], inventory: Vec<InventoryItem>) -> DomainResult<Vec<InventoryItem>> {
    Reconciler::new(SystemClock, UuidIds)
        .run(scans, inventory)
        .map(|outcome| outcome.inventory)
}
