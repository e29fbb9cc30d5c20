/// Core error types for Reprise
use thiserror::Error;

/// Result type alias using `RepriseError`
pub type Result<T> = std::result::Result<T, RepriseError>;

/// Core error type for Reprise
///
/// Persistence-specific kinds (`KeyMissing`) are translated into domain kinds
/// (`NoStoredData`) by the services that own a collection, so callers above the
/// storage layer only match on domain variants.
#[derive(Error, Debug)]
pub enum RepriseError {
    /// Requested key is absent from the key-value store
    #[error("Key \"{key}\" missing from persistent storage")]
    KeyMissing {
        /// Fully namespaced storage key
        key: String,
    },

    /// A piece of domain data was never stored
    #[error("No stored data: {0}")]
    NoStoredData(String),

    /// The decoder could not open the given location
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Any other error reported by the decoder's error-first callbacks
    #[error("Decoder error [{code}]: {message}")]
    Decoder {
        /// Engine error code
        code: String,
        /// Engine error message
        message: String,
    },

    /// An unsupported option was requested
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl RepriseError {
    /// Create a key missing error
    pub fn key_missing(key: impl Into<String>) -> Self {
        Self::KeyMissing { key: key.into() }
    }

    /// Create a no stored data error
    pub fn no_stored_data(msg: impl Into<String>) -> Self {
        Self::NoStoredData(msg.into())
    }

    /// Create a file not found error
    pub fn file_not_found(location: impl Into<String>) -> Self {
        Self::FileNotFound(location.into())
    }

    /// Create a decoder error
    pub fn decoder(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decoder {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(what: impl Into<String>) -> Self {
        Self::NotImplemented(what.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_missing_message_names_the_key() {
        let err = RepriseError::key_missing("TRACK_HISTORY__LAST_TRACK");
        assert_eq!(
            err.to_string(),
            "Key \"TRACK_HISTORY__LAST_TRACK\" missing from persistent storage"
        );
    }

    #[test]
    fn decoder_error_keeps_code_and_message() {
        let err = RepriseError::decoder("seekfail", "position out of range");
        match err {
            RepriseError::Decoder { code, message } => {
                assert_eq!(code, "seekfail");
                assert_eq!(message, "position out of range");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
