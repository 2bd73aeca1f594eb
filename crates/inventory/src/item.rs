use serde::{Deserialize, Serialize};

use stocksnap_core::{HistoryEntryId, IdGenerator, ItemId};

/// Fixed set of stock categories.
///
/// Serialized as the display name. Unknown names coming from storage fall
/// back to [`Category::Other`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Produce,
    Dairy,
    Pantry,
    Beverages,
    Household,
    #[default]
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Produce,
        Category::Dairy,
        Category::Pantry,
        Category::Beverages,
        Category::Household,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::Pantry => "Pantry",
            Category::Beverages => "Beverages",
            Category::Household => "Household",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive lookup; `None` for names outside the fixed set.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// Lenient lookup for persisted names: unknown ones become
    /// [`Category::Other`] with a warning, since the original name is lost.
    pub fn from_stored(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(category = name, "unknown category, stored as Other");
            Category::Other
        })
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from_stored(&value)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Why a ledger entry was recorded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryReason {
    /// Opening balance recorded when the item came into existence.
    Initial,
    /// Quantity edited by hand.
    Manual,
    /// Consumption applied from a scanned list.
    Scanned,
}

/// One immutable ledger fact: "at `timestamp`, quantity moved by `change` to
/// `new_quantity`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub change: i64,
    pub new_quantity: u32,
    pub reason: HistoryReason,
}

/// A stocked item together with its append-only history.
///
/// `quantity` is a cache of the ledger: it always equals the `new_quantity` of
/// the last history entry. It only changes through [`crate::ledger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    quantity: u32,
    #[serde(default)]
    min_stock: u32,
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

impl InventoryItem {
    /// A brand-new item with nothing on hand and an empty ledger.
    pub fn new(id: ItemId, name: impl Into<String>, category: Category, min_stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            quantity: 0,
            min_stock,
            history: Vec::new(),
        }
    }

    /// Same as [`InventoryItem::new`] with a freshly minted id.
    pub fn create(
        ids: &mut impl IdGenerator,
        name: impl Into<String>,
        category: Category,
        min_stock: u32,
    ) -> Self {
        Self::new(ids.item_id(), name, category, min_stock)
    }

    /// Rebuild an item from stored parts, as-is.
    ///
    /// Stored data predates the ledger in some snapshots, so an empty history
    /// with a non-zero quantity is accepted.
    pub fn restore(
        id: ItemId,
        name: impl Into<String>,
        category: Category,
        quantity: u32,
        min_stock: u32,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            quantity,
            min_stock,
            history,
        }
    }

    pub fn id_typed(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn min_stock(&self) -> u32 {
        self.min_stock
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// At or below par.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Whether the cached quantity agrees with the ledger.
    pub fn ledger_consistent(&self) -> bool {
        match self.history.last() {
            Some(last) => last.new_quantity == self.quantity,
            None => true,
        }
    }

    /// Update the descriptive fields. Quantity is untouched.
    pub fn set_details(&mut self, name: impl Into<String>, category: Category, min_stock: u32) {
        self.name = name.into();
        self.category = category;
        self.min_stock = min_stock;
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) {
        self.quantity = entry.new_quantity;
        self.history.push(entry);
    }
}
