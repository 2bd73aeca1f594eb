//! Pre-reconciliation preview of a scanned list.
//!
//! Shows, per scan, what reconciliation would do against the current
//! inventory, so a person can fix names or pick alternatives first.

use serde::Serialize;

use stocksnap_core::ItemId;

use crate::item::InventoryItem;
use crate::matcher::find_match;
use crate::scan::ScanGuess;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScanPreview {
    /// Low confidence with alternatives; must be resolved first.
    NeedsReview,
    /// Nothing matches; reconciliation would infer a new item.
    NewItem,
    /// Would consume stock from an existing item.
    #[serde(rename_all = "camelCase")]
    Matched {
        item_id: ItemId,
        name: String,
        on_hand: u32,
        /// The scan asks for more than is on hand; the excess would be absorbed.
        exceeds_stock: bool,
    },
}

/// One preview per scan, in scan order, matched against `inventory` as it is
/// now (items a batch would create are not considered).
pub fn preview_scans(scans: &[ScanGuess], inventory: &[InventoryItem]) -> Vec<ScanPreview> {
    scans
        .iter()
        .map(|scan| {
            if scan.needs_review() {
                return ScanPreview::NeedsReview;
            }
            match find_match(&scan.name, inventory) {
                Some(item) => ScanPreview::Matched {
                    item_id: item.id_typed().clone(),
                    name: item.name().to_string(),
                    on_hand: item.quantity(),
                    exceeds_stock: item.quantity() < scan.quantity,
                },
                None => ScanPreview::NewItem,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;
    use crate::scan::Confidence;

    #[test]
    fn previews_each_kind() {
        let inventory = vec![InventoryItem::restore(
            ItemId::parse("1").unwrap(),
            "Eggs",
            Category::Dairy,
            6,
            12,
            Vec::new(),
        )];
        let scans = vec![
            ScanGuess::new("eggs", 12),
            ScanGuess::new("Limes", 2),
            ScanGuess {
                name: "Cream".to_string(),
                quantity: 1,
                original_text: "cr".to_string(),
                confidence: Confidence::Low,
                alternatives: vec!["Crackers".to_string()],
            },
        ];

        let previews = preview_scans(&scans, &inventory);
        assert_eq!(
            previews,
            vec![
                ScanPreview::Matched {
                    item_id: ItemId::parse("1").unwrap(),
                    name: "Eggs".to_string(),
                    on_hand: 6,
                    exceeds_stock: true,
                },
                ScanPreview::NewItem,
                ScanPreview::NeedsReview,
            ]
        );
    }
}
