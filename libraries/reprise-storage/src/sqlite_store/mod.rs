//! SQLite-backed key-value store
//!
//! Values are stored as JSON text under the namespaced `collection__key`
//! string in the `kv_store` table.

use async_trait::async_trait;
use reprise_core::storage::{storage_key, KeyValueStore};
use sqlx::{Row, SqlitePool};

use crate::error::StorageError;

type Result<T> = std::result::Result<T, StorageError>;

/// Persistent key-value store on a `SQLite` pool
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Wrap a pool whose migrations have already run
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn get_raw(&self, key: &str) -> Result<serde_json::Value> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let text: String = row.try_get("value")?;
                Ok(serde_json::from_str(&text)?)
            }
            None => Err(StorageError::key_missing(key)),
        }
    }

    async fn set_raw(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(text)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists_raw(&self, key: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, collection: &str, key: &str) -> reprise_core::Result<serde_json::Value> {
        Ok(self.get_raw(&storage_key(collection, key)).await?)
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> reprise_core::Result<()> {
        let key = storage_key(collection, key);
        tracing::trace!(%key, "Writing value");
        Ok(self.set_raw(&key, value).await?)
    }

    async fn exists(&self, collection: &str, key: &str) -> reprise_core::Result<bool> {
        Ok(self.exists_raw(&storage_key(collection, key)).await?)
    }
}
