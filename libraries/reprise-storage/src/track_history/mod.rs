//! Last opened track
//!
//! A single value in the `TRACK_HISTORY` collection holds the URI of the most
//! recently loaded track.

use std::sync::Arc;

use reprise_core::{KeyValueStore, RepriseError, Result};

/// Storage collection holding history entries
pub const COLLECTION: &str = "TRACK_HISTORY";

/// Key of the last opened track URI
pub const LAST_TRACK_KEY: &str = "LAST_TRACK";

const NO_LAST_TRACK: &str = "No last track in persistent storage";

/// Remembers the last opened track
#[derive(Clone)]
pub struct TrackHistoryService {
    store: Arc<dyn KeyValueStore>,
}

impl TrackHistoryService {
    /// Create a history service over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// URI of the last opened track
    ///
    /// # Errors
    ///
    /// Returns [`RepriseError::NoStoredData`] if nothing was ever recorded,
    /// or the underlying error if the store fails
    pub async fn last_track(&self) -> Result<String> {
        let value = match self.store.get(COLLECTION, LAST_TRACK_KEY).await {
            Ok(value) => value,
            Err(RepriseError::KeyMissing { .. }) => {
                return Err(RepriseError::no_stored_data(NO_LAST_TRACK))
            }
            Err(e) => return Err(e),
        };

        Ok(serde_json::from_value(value)?)
    }

    /// Record `uri` as the last opened track
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn set_last_track(&self, uri: &str) -> Result<()> {
        self.store
            .set(COLLECTION, LAST_TRACK_KEY, &serde_json::Value::from(uri))
            .await?;
        tracing::debug!(uri, "Recorded last track");
        Ok(())
    }
}

impl std::fmt::Debug for TrackHistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackHistoryService").finish_non_exhaustive()
    }
}
