//! Search and sort projection for inventory listings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::item::InventoryItem;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Category,
    Quantity,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filter by `search` (case-insensitive substring of name or category), then
/// sort stably by `field`. Text fields compare case-insensitively.
pub fn project<'a>(
    inventory: &'a [InventoryItem],
    search: &str,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a InventoryItem> {
    let needle = search.to_lowercase();

    let mut rows: Vec<&InventoryItem> = inventory
        .iter()
        .filter(|item| {
            item.name().to_lowercase().contains(&needle)
                || item.category().as_str().to_lowercase().contains(&needle)
        })
        .collect();

    rows.sort_by(|a, b| {
        let ord = compare(a, b, field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    rows
}

fn compare(a: &InventoryItem, b: &InventoryItem, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Category => a
            .category()
            .as_str()
            .to_lowercase()
            .cmp(&b.category().as_str().to_lowercase()),
        SortField::Quantity => a.quantity().cmp(&b.quantity()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Category;
    use stocksnap_core::ItemId;

    fn item(id: &str, name: &str, category: Category, quantity: u32) -> InventoryItem {
        InventoryItem::restore(ItemId::parse(id).unwrap(), name, category, quantity, 0, Vec::new())
    }

    fn inventory() -> Vec<InventoryItem> {
        vec![
            item("1", "bread", Category::Pantry, 3),
            item("2", "Apples", Category::Produce, 10),
            item("3", "Oats", Category::Pantry, 1),
            item("4", "Milk", Category::Dairy, 2),
        ]
    }

    fn ids(rows: &[&InventoryItem]) -> Vec<String> {
        rows.iter().map(|i| i.id_typed().to_string()).collect()
    }

    #[test]
    fn sorts_names_case_insensitively() {
        let inv = inventory();
        let rows = project(&inv, "", SortField::Name, SortDirection::Asc);
        assert_eq!(ids(&rows), vec!["2", "1", "4", "3"]);
    }

    #[test]
    fn sort_by_category_is_stable() {
        let inv = inventory();
        let rows = project(&inv, "", SortField::Category, SortDirection::Asc);
        // "bread" and "Oats" share Pantry and keep their input order.
        assert_eq!(ids(&rows), vec!["4", "1", "3", "2"]);

        let rows = project(&inv, "", SortField::Category, SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn sorts_quantity_numerically_descending() {
        let inv = inventory();
        let rows = project(&inv, "", SortField::Quantity, SortDirection::Desc);
        assert_eq!(ids(&rows), vec!["2", "1", "4", "3"]);
    }

    #[test]
    fn search_matches_name_or_category() {
        let inv = inventory();
        assert_eq!(ids(&project(&inv, "PANTRY", SortField::Name, SortDirection::Asc)), vec!["1", "3"]);
        assert_eq!(ids(&project(&inv, "mil", SortField::Name, SortDirection::Asc)), vec!["4"]);
        assert!(project(&inv, "zzz", SortField::Name, SortDirection::Asc).is_empty());
    }

    #[test]
    fn input_is_left_untouched() {
        let inv = inventory();
        let before = inv.clone();
        let _ = project(&inv, "", SortField::Quantity, SortDirection::Asc);
        assert_eq!(inv, before);
    }
}
