//! Command implementations. Each mutating command loads once, applies its
//! change in memory and saves once.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use serde::de::DeserializeOwned;
use serde_json::json;

use stocksnap_core::{SystemClock, UuidIds};
use stocksnap_inventory::{
    HistoryReason, InventoryItem, ItemDraft, ReconcileOptions, Reconciler, ScanGuess,
    SortDirection, SortField, UnderflowPolicy, apply_manual_edits, category_health, find_match,
    history_newest_first, low_stock_alerts, preview_scans, project,
};
use stocksnap_store::{InventoryStore, RefreshOutcome};
use stocksnap_vision::{build_prompt, parse_guesses};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Scans from a JSON array of guesses, or from a vision model's saved answer.
pub fn read_scans(path: &Path, model_reply: bool) -> anyhow::Result<Vec<ScanGuess>> {
    if !model_reply {
        return read_json(path);
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_guesses(&text).with_context(|| format!("unusable model reply in {}", path.display()))
}

/// Save and wait for the background push so it is not cut off at exit.
async fn persist(store: &InventoryStore, items: &[InventoryItem]) -> anyhow::Result<()> {
    if let Some(push) = store.save(items).await? {
        push.await.context("background push task failed")?;
    }
    Ok(())
}

fn format_row(item: &InventoryItem) -> String {
    let flag = if item.is_low_stock() { "  LOW" } else { "" };
    format!(
        "{:<28} {:<10} {:>5} / {:<5}{flag}",
        item.name(),
        item.category(),
        item.quantity(),
        item.min_stock(),
    )
}

fn reason_label(reason: HistoryReason) -> &'static str {
    match reason {
        HistoryReason::Initial => "initial",
        HistoryReason::Manual => "manual",
        HistoryReason::Scanned => "scanned",
    }
}

pub async fn list(
    store: &InventoryStore,
    search: &str,
    field: SortField,
    direction: SortDirection,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let inventory = store.load().await?;
    let rows = project(&inventory, search, field, direction);

    if rows.is_empty() {
        writeln!(out, "no items")?;
    }
    for item in rows {
        writeln!(out, "{}", format_row(item))?;
    }
    Ok(())
}

pub async fn reconcile(
    store: &InventoryStore,
    scans: &[ScanGuess],
    report_underflow: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let unresolved: Vec<&str> = scans
        .iter()
        .filter(|s| s.needs_review())
        .map(|s| s.name.as_str())
        .collect();
    if !unresolved.is_empty() {
        bail!(
            "{} scan(s) need review before reconciling: {}",
            unresolved.len(),
            unresolved.join(", ")
        );
    }

    let inventory = store.load().await?;
    let options = ReconcileOptions {
        underflow: if report_underflow {
            UnderflowPolicy::Report
        } else {
            UnderflowPolicy::Absorb
        },
        ..ReconcileOptions::default()
    };
    let outcome = Reconciler::new(SystemClock, UuidIds)
        .with_options(options)
        .run(scans, inventory)?;

    persist(store, &outcome.inventory).await?;

    writeln!(
        out,
        "reconciled {} scans: {} matched, {} new",
        scans.len(),
        outcome.matched.len(),
        outcome.created.len()
    )?;
    for underflow in &outcome.underflows {
        writeln!(
            out,
            "  {}: asked for {}, only {} on hand",
            underflow.name, underflow.requested, underflow.removed
        )?;
    }
    Ok(())
}

pub async fn preview(
    store: &InventoryStore,
    scans: &[ScanGuess],
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let inventory = store.load().await?;
    let rows: Vec<_> = scans
        .iter()
        .zip(preview_scans(scans, &inventory))
        .map(|(scan, preview)| json!({ "scan": scan, "preview": preview }))
        .collect();

    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out)?;
    Ok(())
}

pub async fn edit(
    store: &InventoryStore,
    drafts: Vec<ItemDraft>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let previous = store.load().await?;
    let items = apply_manual_edits(&previous, drafts, &SystemClock, &mut UuidIds)?;
    persist(store, &items).await?;

    writeln!(out, "saved {} items", items.len())?;
    Ok(())
}

/// Print the extraction prompt, primed with the current item names.
pub async fn prompt(store: &InventoryStore, out: &mut impl Write) -> anyhow::Result<()> {
    let names: Vec<String> = store
        .load()
        .await?
        .iter()
        .map(|item| item.name().to_string())
        .collect();
    write!(out, "{}", build_prompt(&names))?;
    Ok(())
}

pub async fn alerts(store: &InventoryStore, out: &mut impl Write) -> anyhow::Result<()> {
    let inventory = store.load().await?;

    let low = low_stock_alerts(&inventory);
    if low.is_empty() {
        writeln!(out, "all items above par")?;
    } else {
        writeln!(out, "low stock:")?;
        for item in low {
            writeln!(out, "  {}", format_row(item))?;
        }
    }

    writeln!(out, "categories:")?;
    for health in category_health(&inventory).iter().filter(|h| h.items > 0) {
        let flag = if health.is_low { "  LOW" } else { "" };
        writeln!(
            out,
            "  {:<10} {:>5} / {:<5} {:>4.0}%{flag}",
            health.category,
            health.total_quantity,
            health.total_par,
            health.display_ratio * 100.0,
        )?;
    }
    Ok(())
}

pub async fn history(store: &InventoryStore, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let inventory = store.load().await?;
    let Some(item) = find_match(name, &inventory) else {
        bail!("no item matches {name:?}");
    };

    writeln!(out, "{} ({} on hand)", item.name(), item.quantity())?;
    for entry in history_newest_first(item) {
        let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| entry.timestamp.to_string());
        writeln!(
            out,
            "  {when}  {:<8} {:>+6} -> {}",
            reason_label(entry.reason),
            entry.change,
            entry.new_quantity
        )?;
    }
    Ok(())
}

pub async fn sync(store: &InventoryStore, out: &mut impl Write) -> anyhow::Result<()> {
    if !store.sync_config().await?.is_active() {
        writeln!(out, "sync is not configured")?;
        return Ok(());
    }

    match store.refresh().await? {
        RefreshOutcome::Skipped => writeln!(out, "skipped: a save is still being pushed")?,
        RefreshOutcome::Refreshed(items) => {
            let status = store.status().await;
            if status.is_offline() {
                writeln!(out, "remote unavailable, {} items in local cache", items.len())?;
            } else {
                writeln!(out, "pulled {} items", items.len())?;
            }
        }
    }
    Ok(())
}

pub async fn config_show(store: &InventoryStore, out: &mut impl Write) -> anyhow::Result<()> {
    let mut config = store.sync_config().await?;
    if config.api_key.is_some() {
        config.api_key = Some("****".to_string());
    }
    serde_json::to_writer_pretty(&mut *out, &config)?;
    writeln!(out)?;
    Ok(())
}

/// Changes to the stored sync settings; `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub server_url: Option<String>,
    /// An empty key clears the stored one.
    pub api_key: Option<String>,
    pub enabled: Option<bool>,
    pub auto_sync: Option<bool>,
}

pub async fn config_set(
    store: &InventoryStore,
    update: ConfigUpdate,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut config = store.sync_config().await?;
    if let Some(url) = update.server_url {
        config.server_url = url;
    }
    if let Some(key) = update.api_key {
        config.api_key = Some(key).filter(|k| !k.trim().is_empty());
    }
    if let Some(enabled) = update.enabled {
        config.enabled = enabled;
    }
    if let Some(auto_sync) = update.auto_sync {
        config.auto_sync = auto_sync;
    }

    if config.enabled && !config.is_active() {
        tracing::warn!("sync enabled without a server URL; it stays inactive");
    }
    store.save_sync_config(&config).await?;
    writeln!(out, "sync {}", if config.is_active() { "active" } else { "inactive" })?;
    Ok(())
}
