//! Track identity derivation
//!
//! A track's identity is `sha1(uri + "-" + checksum)`, hex encoded. The
//! checksum strategy is configurable; the separator and the SHA-1 step are
//! fixed, since changing either invalidates every persisted track id.
//!
//! # Example
//!
//! ```rust
//! use reprise_core::identity::{hasher_for, track_id_for_uri, ChecksumKind};
//!
//! # async fn example() -> reprise_core::Result<()> {
//! let hasher = hasher_for(ChecksumKind::Md5Uri);
//! let first = track_id_for_uri(hasher.as_ref(), "/music/song.mp3").await?;
//! let second = track_id_for_uri(hasher.as_ref(), "/music/song.mp3").await?;
//! assert_eq!(first, second);
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

use crate::error::{RepriseError, Result};
use crate::util::uri_to_path;

/// Separator between the URI and the checksum in the track id input
pub const TRACK_ID_SEPARATOR: &str = "-";

/// Read size used when hashing file content
const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Derive the track id for a `(uri, checksum)` pair
pub fn compute_track_id(uri: &str, checksum: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(uri.as_bytes());
    hasher.update(TRACK_ID_SEPARATOR.as_bytes());
    hasher.update(checksum.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derives stable track identifiers
///
/// Both operations are deterministic. `checksum` may read the file and fails
/// if it is unreadable; it never fails for a well-formed URI otherwise.
#[async_trait]
pub trait IdentityHasher: Send + Sync {
    /// Content fingerprint for `uri`
    async fn checksum(&self, uri: &str) -> Result<String>;

    /// Track id for `uri` with the given checksum
    async fn track_id(&self, uri: &str, checksum: &str) -> Result<String> {
        Ok(compute_track_id(uri, checksum))
    }
}

/// Compute checksum then track id for `uri`
pub async fn track_id_for_uri(hasher: &dyn IdentityHasher, uri: &str) -> Result<String> {
    let checksum = hasher.checksum(uri).await?;
    hasher.track_id(uri, &checksum).await
}

/// Checksum strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecksumKind {
    /// MD5 of the file content
    #[default]
    Md5File,
    /// MD5 of the location string
    Md5Uri,
    /// Degraded passthrough: the checksum is the URI itself
    Identity,
}

impl ChecksumKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5File => "md5-file",
            Self::Md5Uri => "md5-uri",
            Self::Identity => "identity",
        }
    }
}

impl FromStr for ChecksumKind {
    type Err = RepriseError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md5-file" => Ok(Self::Md5File),
            "md5-uri" => Ok(Self::Md5Uri),
            "identity" => Ok(Self::Identity),
            other => Err(RepriseError::not_implemented(format!(
                "checksum algorithm '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the hasher for a checksum strategy
pub fn hasher_for(kind: ChecksumKind) -> Arc<dyn IdentityHasher> {
    match kind {
        ChecksumKind::Md5File => Arc::new(FileMd5Hasher),
        ChecksumKind::Md5Uri => Arc::new(UriMd5Hasher),
        ChecksumKind::Identity => Arc::new(PassthroughHasher),
    }
}

/// Hashes the file content with MD5
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMd5Hasher;

#[async_trait]
impl IdentityHasher for FileMd5Hasher {
    async fn checksum(&self, uri: &str) -> Result<String> {
        let path = uri_to_path(uri);
        let mut file = tokio::fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RepriseError::file_not_found(uri)
            } else {
                RepriseError::Io(e)
            }
        })?;

        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; HASH_CHUNK_SIZE];
        let mut total = 0usize;
        loop {
            let read = file.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
            total += read;
        }

        tracing::trace!(uri, bytes = total, "Hashed file content");
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Hashes the location string with MD5
#[derive(Debug, Clone, Copy, Default)]
pub struct UriMd5Hasher;

#[async_trait]
impl IdentityHasher for UriMd5Hasher {
    async fn checksum(&self, uri: &str) -> Result<String> {
        Ok(hex::encode(Md5::digest(uri.as_bytes())))
    }
}

/// Uses the URI as its own checksum
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughHasher;

#[async_trait]
impl IdentityHasher for PassthroughHasher {
    async fn checksum(&self, uri: &str) -> Result<String> {
        Ok(uri.to_string())
    }
}
