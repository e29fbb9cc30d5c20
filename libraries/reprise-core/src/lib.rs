//! Reprise Core
//!
//! Platform-agnostic core types, traits, and error handling for Reprise.
//!
//! This crate provides the foundational building blocks shared by the storage,
//! playback and application crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackProgress`, `AudioFile`, `PlayerState`
//! - **Core Traits**: `KeyValueStore`, `IdentityHasher`
//! - **Error Handling**: Unified `RepriseError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use reprise_core::identity::{compute_track_id, ChecksumKind};
//! use reprise_core::util::format_time;
//!
//! let kind: ChecksumKind = "md5-uri".parse().unwrap();
//! assert_eq!(kind, ChecksumKind::Md5Uri);
//!
//! let id = compute_track_id("/music/song.mp3", "abc");
//! assert_eq!(id.len(), 40);
//!
//! assert_eq!(format_time(3_723_000), "01:02:03");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod identity;
pub mod storage;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use error::{RepriseError, Result};
pub use identity::{ChecksumKind, IdentityHasher};
pub use storage::KeyValueStore;
pub use types::{AudioFile, PlayerState, TrackProgress};
