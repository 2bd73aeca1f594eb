//! Read-only summaries for dashboards: low-stock alerts, per-category health,
//! and history orderings for charts and detail views.

use serde::Serialize;

use crate::item::{Category, HistoryEntry, InventoryItem};

/// Display ratios are capped so one overstocked category doesn't dwarf the rest.
const DISPLAY_RATIO_CAP: f64 = 1.5;

/// Items at or below par, in input order.
pub fn low_stock_alerts(inventory: &[InventoryItem]) -> Vec<&InventoryItem> {
    inventory.iter().filter(|item| item.is_low_stock()).collect()
}

/// Stock-versus-par summary for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHealth {
    pub category: Category,
    pub items: usize,
    pub total_quantity: u64,
    pub total_par: u64,
    /// `total_quantity / total_par`; 1.0 when there is stock but no par.
    pub ratio: f64,
    pub display_ratio: f64,
    /// Under par while still holding some stock.
    pub is_low: bool,
}

/// One summary per category, in [`Category::ALL`] order. Empty categories are
/// included with zero totals.
pub fn category_health(inventory: &[InventoryItem]) -> Vec<CategoryHealth> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let (items, total_quantity, total_par) = inventory
                .iter()
                .filter(|item| item.category() == category)
                .fold((0usize, 0u64, 0u64), |(n, q, p), item| {
                    (n + 1, q + u64::from(item.quantity()), p + u64::from(item.min_stock()))
                });

            let ratio = if total_par > 0 {
                total_quantity as f64 / total_par as f64
            } else if total_quantity > 0 {
                1.0
            } else {
                0.0
            };

            CategoryHealth {
                category,
                items,
                total_quantity,
                total_par,
                ratio,
                display_ratio: ratio.min(DISPLAY_RATIO_CAP),
                is_low: ratio < 1.0 && total_quantity > 0,
            }
        })
        .collect()
}

/// `(timestamp, quantity)` points, oldest first, for trend lines.
pub fn trend_series(item: &InventoryItem) -> Vec<(i64, u32)> {
    let mut points: Vec<(i64, u32)> = item
        .history()
        .iter()
        .map(|e| (e.timestamp, e.new_quantity))
        .collect();
    points.sort_by_key(|(ts, _)| *ts);
    points
}

/// History for display, newest first. Entries sharing a timestamp keep their
/// ledger order. The ledger itself is not reordered.
pub fn history_newest_first(item: &InventoryItem) -> Vec<&HistoryEntry> {
    let mut entries: Vec<&HistoryEntry> = item.history().iter().collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}
