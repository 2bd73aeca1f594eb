//! Append-only per-item history ledger.
//!
//! Every quantity change goes through [`append`], which derives the resulting
//! quantity, clamps at zero, and suppresses entries that would record no
//! movement. The item's cached `quantity` is updated in the same step, so
//! `quantity == history.last().new_quantity` holds after every call.

use stocksnap_core::{Clock, IdGenerator};

use crate::item::{HistoryEntry, HistoryReason, InventoryItem};

/// Apply `change` to `item` and record it.
///
/// - The resulting quantity is `max(0, quantity + change)`; the recorded
///   `change` is the effective one (smaller in magnitude when clamped).
/// - A zero effective change is not recorded and the item comes back
///   untouched, except for [`HistoryReason::Initial`], which is always
///   recorded so every item has a creation record.
pub fn append(
    mut item: InventoryItem,
    change: i64,
    reason: HistoryReason,
    timestamp: i64,
    ids: &mut impl IdGenerator,
) -> (InventoryItem, Option<HistoryEntry>) {
    let current = i64::from(item.quantity());
    let new_quantity = (current.saturating_add(change)).clamp(0, i64::from(u32::MAX)) as u32;
    let effective = i64::from(new_quantity) - current;

    if effective == 0 && reason != HistoryReason::Initial {
        return (item, None);
    }

    let entry = HistoryEntry {
        id: ids.entry_id(),
        timestamp,
        change: effective,
        new_quantity,
        reason,
    };
    item.record(entry.clone());

    (item, Some(entry))
}

/// Ledger bound to a clock and an id source, for callers that record one-off
/// changes outside a reconciliation batch.
#[derive(Debug, Clone)]
pub struct Ledger<C, G> {
    clock: C,
    ids: G,
}

impl<C: Clock, G: IdGenerator> Ledger<C, G> {
    pub fn new(clock: C, ids: G) -> Self {
        Self { clock, ids }
    }

    /// See [`append`]. Uses the clock unless a timestamp is supplied.
    pub fn append(
        &mut self,
        item: InventoryItem,
        change: i64,
        reason: HistoryReason,
        timestamp: Option<i64>,
    ) -> (InventoryItem, Option<HistoryEntry>) {
        let timestamp = timestamp.unwrap_or_else(|| self.clock.now_millis());
        append(item, change, reason, timestamp, &mut self.ids)
    }
}
