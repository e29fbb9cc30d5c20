//! Reprise - Playback
//!
//! The playback state machine and the adapter over native decoder engines.
//!
//! This crate provides:
//! - The callback-style decoder contract ([`NativeEngine`], [`NativePlayer`])
//! - An async adapter over it ([`DecoderHandle`])
//! - The [`PlaybackController`]: load, play/pause, seek, relative seek, reset,
//!   end-of-track handling and startup resume
//! - Observable state ([`PlayerSnapshot`]) and [`PlaybackEvent`]s
//!
//! # Architecture
//!
//! The controller depends on storage only through the progress repository
//! and history service, and on audio only through [`NativeEngine`].
//! Platform engines live in their own crates.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reprise_core::identity::{hasher_for, ChecksumKind};
//! use reprise_core::AudioFile;
//! use reprise_playback::{NativeEngine, PlaybackController};
//! use reprise_storage::{MemoryKeyValueStore, TrackHistoryService, TrackProgressRepository};
//!
//! # async fn example(engine: Arc<dyn NativeEngine>) -> reprise_core::Result<()> {
//! let store = Arc::new(MemoryKeyValueStore::new());
//! let repository = TrackProgressRepository::new(store.clone(), hasher_for(ChecksumKind::Md5Uri));
//! let history = TrackHistoryService::new(store);
//!
//! let mut controller = PlaybackController::new(engine, repository, history);
//!
//! if !controller.load_last_opened_track().await? {
//!     controller.load(&AudioFile::from_uri("/music/song.mp3")).await?;
//! }
//!
//! controller.play_pause().await?;
//! controller.relative_seek(15_000).await?;
//! # Ok(())
//! # }
//! ```

mod controller;
pub mod decoder;
mod events;

// Public exports
pub use controller::{clamp_seek_target, PlaybackController};
pub use decoder::{
    Completion, DecoderHandle, EndedCallback, NativeEngine, NativeError, NativePlayer,
    PlayerOptions,
};
pub use events::{PlaybackEvent, PlayerSnapshot};
pub use reprise_core::{RepriseError, Result};
