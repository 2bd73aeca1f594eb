//! Manual edits from the setup form.
//!
//! The form submits the whole list. Quantities are compared with the previously
//! stored items by id: unchanged quantities record nothing, changed ones record
//! one `manual` entry, and unknown ids get an `initial` entry.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use stocksnap_core::{Clock, DomainError, DomainResult, IdGenerator, ItemId};

use crate::item::{Category, HistoryReason, InventoryItem};
use crate::ledger::append;
use crate::scan::ScanGuess;

/// One row of the setup form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    /// `None` for rows added in this session.
    #[serde(default)]
    pub id: Option<ItemId>,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub quantity: u32,
    #[serde(default)]
    pub min_stock: u32,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, category: Category, quantity: u32, min_stock: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            category,
            quantity,
            min_stock,
        }
    }

    /// Form row pre-filled from a stored item.
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            id: Some(item.id_typed().clone()),
            name: item.name().to_string(),
            category: item.category(),
            quantity: item.quantity(),
            min_stock: item.min_stock(),
        }
    }
}

/// Build the new inventory from a submitted setup form.
///
/// Items absent from `submitted` are dropped. History of kept items is carried
/// over and only ever appended to.
pub fn apply_manual_edits(
    previous: &[InventoryItem],
    submitted: Vec<ItemDraft>,
    clock: &impl Clock,
    ids: &mut impl IdGenerator,
) -> DomainResult<Vec<InventoryItem>> {
    let mut seen = HashSet::new();
    for draft in &submitted {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(id) = &draft.id {
            if !seen.insert(id.clone()) {
                return Err(DomainError::conflict(format!("item {id} submitted twice")));
            }
        }
    }

    let timestamp = clock.now_millis();
    let by_id: HashMap<&ItemId, &InventoryItem> =
        previous.iter().map(|item| (item.id_typed(), item)).collect();

    let items = submitted
        .into_iter()
        .map(|draft| {
            let name = draft.name.trim().to_string();
            match draft.id.as_ref().and_then(|id| by_id.get(id)) {
                Some(existing) => {
                    let mut item = (*existing).clone();
                    item.set_details(name, draft.category, draft.min_stock);
                    let change = i64::from(draft.quantity) - i64::from(item.quantity());
                    append(item, change, HistoryReason::Manual, timestamp, &mut *ids).0
                }
                None => {
                    let id = match draft.id {
                        Some(id) => id,
                        None => ids.item_id(),
                    };
                    let item = InventoryItem::new(id, name, draft.category, draft.min_stock);
                    append(
                        item,
                        i64::from(draft.quantity),
                        HistoryReason::Initial,
                        timestamp,
                        &mut *ids,
                    )
                    .0
                }
            }
        })
        .collect();

    Ok(items)
}

/// Fold a scanned list into setup-form rows.
///
/// An exact (case-insensitive) name match sets that row's quantity, and gives
/// it a par of half the quantity (rounded up) if it had none. Other scans
/// become new `Other` rows with the same par guess.
pub fn seed_from_scans(mut drafts: Vec<ItemDraft>, scans: &[ScanGuess]) -> Vec<ItemDraft> {
    for scan in scans {
        let par_guess = scan.quantity.div_ceil(2);
        let existing = drafts
            .iter_mut()
            .find(|d| d.name.to_lowercase() == scan.name.to_lowercase());

        match existing {
            Some(draft) => {
                draft.quantity = scan.quantity;
                if draft.min_stock == 0 {
                    draft.min_stock = par_guess;
                }
            }
            None => drafts.push(ItemDraft::new(
                scan.name.clone(),
                Category::Other,
                scan.quantity,
                par_guess,
            )),
        }
    }
    drafts
}
