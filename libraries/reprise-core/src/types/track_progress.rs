/// Per-track resume state
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::identity::IdentityHasher;

/// Resume state for one track
///
/// `track_id` is derived from `uri` and `checksum` and never changes after
/// creation; `current_time` is the only field mutated afterwards.
///
/// Serialized with the field names `trackId`, `uri`, `checksum` and
/// `currentTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackProgress {
    /// Derived identifier, primary key in the repository
    pub track_id: String,

    /// Location handle used to reopen the file
    pub uri: String,

    /// Content fingerprint used as input to the identity derivation
    pub checksum: String,

    /// Last known playback position in milliseconds
    pub current_time: i64,
}

impl TrackProgress {
    /// Build a fresh record for `uri`, starting at position zero
    ///
    /// Computes the checksum first, then the track id.
    pub async fn make(hasher: &dyn IdentityHasher, uri: &str) -> Result<Self> {
        let checksum = hasher.checksum(uri).await?;
        let track_id = hasher.track_id(uri, &checksum).await?;

        Ok(Self {
            track_id,
            uri: uri.to_string(),
            checksum,
            current_time: 0,
        })
    }
}
