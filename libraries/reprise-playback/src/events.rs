//! Playback Events
//!
//! Two channels keep UI layers in sync with the controller:
//! - a `watch` channel carrying the latest [`PlayerSnapshot`], for rendering
//! - a `broadcast` channel of [`PlaybackEvent`]s, for reacting to transitions

use reprise_core::PlayerState;
use serde::{Deserialize, Serialize};

/// Observable controller fields
///
/// Published as one value, so observers never see `title` from one track
/// combined with `is_loaded` from another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Whether a decoder handle is live
    pub is_loaded: bool,

    /// Display title of the loaded track, empty when unloaded
    pub title: String,

    /// Play/pause state
    pub player_state: PlayerState,
}

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// A track finished loading and is paused at its resume point
    Loaded {
        /// Location of the track
        uri: String,
        /// Display title
        title: String,
        /// Stored position the controller is about to seek to
        resume_at: i64,
    },

    /// Play/pause state changed
    StateChanged(PlayerState),

    /// Progress for the loaded track was written to storage
    Checkpointed {
        /// Track the checkpoint belongs to
        track_id: String,
        /// Saved position in milliseconds
        current_time: i64,
    },

    /// The loaded track played to its end and was rewound
    TrackEnded,

    /// The decoder was released
    Reset,
}
