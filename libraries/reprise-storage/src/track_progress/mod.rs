//! Per-track resume state
//!
//! Records live in the `TRACK_PROGRESS` collection keyed by track id. A record
//! is created in memory on first sight and only written when the caller
//! checkpoints it with [`TrackProgressRepository::save`].

use std::sync::Arc;

use reprise_core::identity::track_id_for_uri;
use reprise_core::{IdentityHasher, KeyValueStore, Result, TrackProgress};

/// Storage collection holding progress records
pub const COLLECTION: &str = "TRACK_PROGRESS";

/// Looks up and persists [`TrackProgress`] records
#[derive(Clone)]
pub struct TrackProgressRepository {
    store: Arc<dyn KeyValueStore>,
    hasher: Arc<dyn IdentityHasher>,
}

impl TrackProgressRepository {
    /// Create a repository over `store`, deriving ids with `hasher`
    pub fn new(store: Arc<dyn KeyValueStore>, hasher: Arc<dyn IdentityHasher>) -> Self {
        Self { store, hasher }
    }

    /// Identity hasher used for lookups
    pub fn hasher(&self) -> &Arc<dyn IdentityHasher> {
        &self.hasher
    }

    /// Return the stored record for `uri`, or a fresh one at position zero
    ///
    /// A fresh record is not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be fingerprinted or the store fails
    pub async fn get_or_create(&self, uri: &str) -> Result<TrackProgress> {
        if let Some(progress) = self.find(uri).await? {
            tracing::debug!(
                track_id = %progress.track_id,
                current_time = progress.current_time,
                "Found stored progress"
            );
            return Ok(progress);
        }

        let progress = TrackProgress::make(self.hasher.as_ref(), uri).await?;
        tracing::debug!(track_id = %progress.track_id, "Created new progress record");
        Ok(progress)
    }

    /// Return the stored record for `uri`, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be fingerprinted or the store fails
    pub async fn find(&self, uri: &str) -> Result<Option<TrackProgress>> {
        let track_id = track_id_for_uri(self.hasher.as_ref(), uri).await?;

        if !self.store.exists(COLLECTION, &track_id).await? {
            return Ok(None);
        }

        let value = self.store.get(COLLECTION, &track_id).await?;
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Persist `progress`, replacing any record with the same track id
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails
    pub async fn save(&self, progress: &TrackProgress) -> Result<()> {
        let value = serde_json::to_value(progress)?;
        self.store
            .set(COLLECTION, &progress.track_id, &value)
            .await?;

        tracing::debug!(
            track_id = %progress.track_id,
            current_time = progress.current_time,
            "Saved progress"
        );
        Ok(())
    }
}

impl std::fmt::Debug for TrackProgressRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackProgressRepository").finish_non_exhaustive()
    }
}
