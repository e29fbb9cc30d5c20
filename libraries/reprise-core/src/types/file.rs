/// Audio file selection types
use serde::{Deserialize, Serialize};

use crate::util::uri_display_name;

/// A file picked from the media library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFile {
    /// Location handle used to open the file
    pub uri: String,

    /// Display name
    pub name: String,
}

impl AudioFile {
    /// Create a file with an explicit display name
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }

    /// Create a file whose display name is derived from the URI
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let name = uri_display_name(&uri);
        Self { uri, name }
    }
}
