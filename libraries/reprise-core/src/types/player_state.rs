/// Player state types
use serde::{Deserialize, Serialize};

/// Play/pause condition of the loaded track
///
/// Derived from the decoder's own `is_playing` flag after every transition.
/// An unloaded player reports `Paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// Decoder is producing audio
    Playing,
    /// Decoder is paused, or nothing is loaded
    #[default]
    Paused,
}

impl PlayerState {
    /// Map a decoder `is_playing` flag to a state
    #[must_use]
    pub fn from_playing(is_playing: bool) -> Self {
        if is_playing {
            Self::Playing
        } else {
            Self::Paused
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
