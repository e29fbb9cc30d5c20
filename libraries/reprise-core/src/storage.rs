//! Key-value storage trait
//!
//! The persistence backend is modeled only by its get/set/exists contract.
//! Keys are namespaced per collection and values are JSON documents.

use crate::error::Result;
use async_trait::async_trait;

/// Delimiter between the collection and key parts of a storage key
pub const KEY_PART_DELIMITER: &str = "__";

/// Build the namespaced storage key for `key` within `collection`
///
/// ```rust
/// use reprise_core::storage::storage_key;
///
/// assert_eq!(storage_key("TRACK_HISTORY", "LAST_TRACK"), "TRACK_HISTORY__LAST_TRACK");
/// ```
pub fn storage_key(collection: &str, key: &str) -> String {
    format!("{collection}{KEY_PART_DELIMITER}{key}")
}

/// Namespaced, string-keyed persistent storage
///
/// Implementations must report an absent key from `get` as
/// [`RepriseError::KeyMissing`](crate::RepriseError::KeyMissing), distinct from
/// any other backend failure.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `collection`/`key`
    async fn get(&self, collection: &str, key: &str) -> Result<serde_json::Value>;

    /// Store `value` under `collection`/`key`, overwriting any previous value
    async fn set(&self, collection: &str, key: &str, value: &serde_json::Value) -> Result<()>;

    /// Check whether a value is stored under `collection`/`key`
    async fn exists(&self, collection: &str, key: &str) -> Result<bool>;
}
