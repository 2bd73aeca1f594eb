//! Key/value blob storage for snapshots and settings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::sync::{Mutex, RwLock};

use crate::error::StoreError;

/// String blobs addressed by key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}

/// In-memory blob store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().await.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed blob store.
///
/// The connection pool is opened lazily on first use.
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    location: Location,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteBlobStore {
    /// Store at an explicit database file (created if missing).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_location(Location::File(path.into()))
    }

    /// Store at `{app_data_dir}/stocksnap/store.db`.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = default_db_path().map_err(StoreError::backend)?;
        Ok(Self::open(path))
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        Self {
            location,
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the pool, initializing it if necessary.
    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create store directory at {parent:?}"))?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePool::connect_with(options)
                    .await
                    .with_context(|| format!("failed to open SQLite store at {path:?}"))?
            }
            // A single connection that never expires: each new connection to
            // `:memory:` would otherwise see an empty database.
            Location::Memory => SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(SqliteConnectOptions::new().in_memory(true))
                .await
                .context("failed to open in-memory SQLite store")?,
        };

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blobs (
                key        TEXT PRIMARY KEY NOT NULL,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create blobs table")?;

        *guard = Some(pool.clone());
        Ok(pool)
    }

    async fn get_inner(&self, key: &str) -> anyhow::Result<Option<String>> {
        let pool = self.get_pool().await?;
        let row = sqlx::query("SELECT data FROM blobs WHERE key = ?1")
            .bind(key)
            .fetch_optional(&pool)
            .await
            .with_context(|| format!("failed to read blob {key}"))?;

        match row {
            Some(row) => Ok(Some(row.try_get("data")?)),
            None => Ok(None),
        }
    }

    async fn put_inner(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO blobs (key, data, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                data = excluded.data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to upsert blob {key}"))?;

        Ok(())
    }

    async fn delete_inner(&self, key: &str) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        sqlx::query("DELETE FROM blobs WHERE key = ?1")
            .bind(key)
            .execute(&pool)
            .await
            .with_context(|| format!("failed to delete blob {key}"))?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_inner(key).await.map_err(StoreError::backend)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_inner(key, value).await.map_err(StoreError::backend)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.delete_inner(key).await.map_err(StoreError::backend)
    }
}

/// Resolve `{app_data_dir}/stocksnap/store.db`.
fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("stocksnap");
    path.push("store.db");
    Ok(path)
}
