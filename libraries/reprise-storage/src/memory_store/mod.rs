//! In-process key-value store
//!
//! Keeps JSON text in a map so values go through the same encode/decode path
//! as the SQLite backend. Nothing survives the process.

use std::collections::HashMap;

use async_trait::async_trait;
use reprise_core::storage::{storage_key, KeyValueStore};
use reprise_core::{RepriseError, Result};
use tokio::sync::RwLock;

/// Ephemeral key-value store
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, collection: &str, key: &str) -> Result<serde_json::Value> {
        let key = storage_key(collection, key);
        let entries = self.entries.read().await;
        let text = entries
            .get(&key)
            .ok_or_else(|| RepriseError::key_missing(&key))?;
        Ok(serde_json::from_str(text)?)
    }

    async fn set(&self, collection: &str, key: &str, value: &serde_json::Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.entries
            .write()
            .await
            .insert(storage_key(collection, key), text);
        Ok(())
    }

    async fn exists(&self, collection: &str, key: &str) -> Result<bool> {
        Ok(self
            .entries
            .read()
            .await
            .contains_key(&storage_key(collection, key)))
    }
}
