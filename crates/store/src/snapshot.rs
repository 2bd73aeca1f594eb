//! Tolerant decoding of stored inventory snapshots.
//!
//! Snapshots come from older clients and from a remote store we do not
//! control. Missing or malformed fields are defaulted; records that cannot be
//! identified at all are dropped with a warning.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use stocksnap_core::{HistoryEntryId, ItemId};
use stocksnap_inventory::{Category, HistoryEntry, HistoryReason, InventoryItem};

/// The snapshot could not be read as a list of items at all.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(String),
    #[error("snapshot is not a JSON array")]
    NotAnArray,
}

/// Parse and normalize a stored snapshot.
pub fn parse_snapshot(text: &str) -> Result<Vec<InventoryItem>, SnapshotError> {
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| SnapshotError::Json(e.to_string()))?;
    normalize_snapshot(value)
}

/// Normalize an already-parsed snapshot.
pub fn normalize_snapshot(value: JsonValue) -> Result<Vec<InventoryItem>, SnapshotError> {
    let JsonValue::Array(records) = value else {
        return Err(SnapshotError::NotAnArray);
    };

    let items = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let item = normalize_item(&record);
            if item.is_none() {
                tracing::warn!(index, "dropping unreadable inventory record");
            }
            item
        })
        .collect();

    Ok(items)
}

fn normalize_item(record: &JsonValue) -> Option<InventoryItem> {
    let fields = record.as_object()?;

    let id = ItemId::parse(id_string(fields.get("id")?)?).ok()?;
    let name = fields.get("name")?.as_str()?.to_string();
    let category = fields
        .get("category")
        .and_then(JsonValue::as_str)
        .map(Category::from_stored)
        .unwrap_or_default();
    let quantity = count(fields, "quantity");
    let min_stock = count(fields, "minStock");

    let history = match fields.get("history") {
        Some(JsonValue::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let parsed = normalize_entry(entry);
                if parsed.is_none() {
                    tracing::warn!(item_id = %id, "dropping unreadable history entry");
                }
                parsed
            })
            .collect(),
        _ => Vec::new(),
    };

    Some(InventoryItem::restore(
        id, name, category, quantity, min_stock, history,
    ))
}

fn normalize_entry(entry: &JsonValue) -> Option<HistoryEntry> {
    let fields = entry.as_object()?;

    let id = HistoryEntryId::parse(id_string(fields.get("id")?)?).ok()?;
    let timestamp = fields.get("timestamp").and_then(as_rounded)?;
    let reason = match fields.get("reason").and_then(JsonValue::as_str)? {
        "initial" => HistoryReason::Initial,
        "manual" => HistoryReason::Manual,
        "scanned" => HistoryReason::Scanned,
        _ => return None,
    };
    let change = fields.get("change").and_then(as_rounded).unwrap_or(0);

    Some(HistoryEntry {
        id,
        timestamp,
        change,
        new_quantity: count(fields, "newQuantity"),
        reason,
    })
}

/// Ids were numbers in some older snapshots.
fn id_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_rounded(value: &JsonValue) -> Option<i64> {
    match value.as_i64() {
        Some(n) => Some(n),
        None => value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
    }
}

/// Non-negative whole count; anything unreadable is 0.
fn count(fields: &Map<String, JsonValue>, key: &str) -> u32 {
    fields
        .get(key)
        .and_then(as_rounded)
        .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}
