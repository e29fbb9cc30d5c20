/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Requested key is absent
    #[error("Key \"{key}\" missing from persistent storage")]
    KeyMissing { key: String },

    /// Stored value could not be encoded or decoded
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Migration error
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StorageError {
    /// Create a key missing error
    pub fn key_missing(key: impl Into<String>) -> Self {
        Self::KeyMissing { key: key.into() }
    }
}

impl From<StorageError> for reprise_core::RepriseError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::KeyMissing { key } => reprise_core::RepriseError::KeyMissing { key },
            StorageError::Serialization(e) => reprise_core::RepriseError::Serialization(e),
            other => reprise_core::RepriseError::storage(other.to_string()),
        }
    }
}
