//! Playback controller
//!
//! Owns the decoder handle for the loaded track and keeps the stored resume
//! point and last-track pointer consistent with it.
//!
//! All operations take `&mut self`: the controller has a single owner and
//! expects each call to finish before the next one starts.

use std::sync::Arc;

use reprise_core::{AudioFile, PlayerState, RepriseError, Result, TrackProgress};
use reprise_storage::{TrackHistoryService, TrackProgressRepository};
use tokio::sync::{broadcast, mpsc, watch};

use crate::decoder::{DecoderHandle, NativeEngine, PlayerOptions};
use crate::events::{PlaybackEvent, PlayerSnapshot};

const EVENT_CAPACITY: usize = 64;

/// Clamp `current + delta` to `[0, max(duration, 0)]`
///
/// ```rust
/// use reprise_playback::clamp_seek_target;
///
/// assert_eq!(clamp_seek_target(5_000, 10_000, 10_000), 10_000);
/// assert_eq!(clamp_seek_target(5_000, -20_000, 10_000), 0);
/// ```
pub fn clamp_seek_target(current: i64, delta: i64, duration: i64) -> i64 {
    current.saturating_add(delta).clamp(0, duration.max(0))
}

/// Decoder and resume state for the loaded track
struct LoadedTrack {
    decoder: DecoderHandle,
    progress: TrackProgress,
    generation: u64,
}

/// Single owner of playback state
pub struct PlaybackController {
    engine: Arc<dyn NativeEngine>,
    repository: TrackProgressRepository,
    history: TrackHistoryService,
    options: PlayerOptions,

    loaded: Option<LoadedTrack>,
    generation: u64,

    snapshot: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<PlaybackEvent>,
    ended_tx: mpsc::UnboundedSender<u64>,
    ended_rx: mpsc::UnboundedReceiver<u64>,
}

impl PlaybackController {
    /// Create an unloaded controller
    pub fn new(
        engine: Arc<dyn NativeEngine>,
        repository: TrackProgressRepository,
        history: TrackHistoryService,
    ) -> Self {
        let (snapshot, _) = watch::channel(PlayerSnapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (ended_tx, ended_rx) = mpsc::unbounded_channel();

        Self {
            engine,
            repository,
            history,
            options: PlayerOptions::default(),
            loaded: None,
            generation: 0,
            snapshot,
            events,
            ended_tx,
            ended_rx,
        }
    }

    /// Use `options` for every decoder opened from now on
    #[must_use]
    pub fn with_options(mut self, options: PlayerOptions) -> Self {
        self.options = options;
        self
    }

    /// Watch the observable fields
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.subscribe()
    }

    /// Receive playback events
    pub fn events(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Current observable fields
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Whether a track is loaded
    pub fn is_loaded(&self) -> bool {
        self.snapshot.borrow().is_loaded
    }

    /// Title of the loaded track, empty when unloaded
    pub fn title(&self) -> String {
        self.snapshot.borrow().title.clone()
    }

    /// Play/pause state
    pub fn player_state(&self) -> PlayerState {
        self.snapshot.borrow().player_state
    }

    /// Playhead position in milliseconds, zero when unloaded
    pub fn current_time(&self) -> i64 {
        self.loaded
            .as_ref()
            .map_or(0, |track| track.decoder.current_time())
    }

    /// Track length in milliseconds, zero when unloaded
    pub fn duration(&self) -> i64 {
        self.loaded
            .as_ref()
            .map_or(0, |track| track.decoder.duration())
    }

    /// In-memory resume state of the loaded track
    pub fn track_progress(&self) -> Option<&TrackProgress> {
        self.loaded.as_ref().map(|track| &track.progress)
    }

    /// Load `file`, paused at its stored resume point
    ///
    /// Any loaded track is reset first. On any failure the new decoder is
    /// stopped and the controller is left unloaded.
    ///
    /// # Errors
    ///
    /// Returns [`RepriseError::FileNotFound`] if the decoder cannot open the
    /// location, or any decoder or storage error unchanged
    pub async fn load(&mut self, file: &AudioFile) -> Result<()> {
        if self.loaded.is_some() {
            self.reset().await?;
        }

        tracing::info!(uri = %file.uri, title = %file.name, "Loading track");

        self.generation += 1;
        let generation = self.generation;

        let mut decoder = DecoderHandle::open(self.engine.as_ref(), &file.uri, self.options)?;
        let ended_tx = self.ended_tx.clone();
        decoder.on_ended(Box::new(move || {
            // Receiver lives as long as the controller
            let _ = ended_tx.send(generation);
        }));
        decoder.prepare().await?;

        let progress = match self.repository.get_or_create(&file.uri).await {
            Ok(progress) => progress,
            Err(e) => {
                release(&mut decoder).await;
                return Err(e);
            }
        };
        let resume_at = progress.current_time;

        self.loaded = Some(LoadedTrack {
            decoder,
            progress,
            generation,
        });
        self.publish(|snapshot| {
            snapshot.is_loaded = true;
            snapshot.title.clone_from(&file.name);
            snapshot.player_state = PlayerState::Paused;
        });
        self.emit(PlaybackEvent::Loaded {
            uri: file.uri.clone(),
            title: file.name.clone(),
            resume_at,
        });

        let restored = match self.seek(resume_at).await {
            Ok(()) => self.history.set_last_track(&file.uri).await,
            Err(e) => Err(e),
        };
        if let Err(e) = restored {
            self.abandon_load().await;
            return Err(e);
        }

        tracing::info!(uri = %file.uri, resume_at, "Track loaded");
        Ok(())
    }

    /// Undo a published load that failed part way
    async fn abandon_load(&mut self) {
        let Some(mut track) = self.loaded.take() else {
            return;
        };

        tracing::warn!(uri = track.decoder.uri(), "Load failed after publishing, unloading");
        release(&mut track.decoder).await;

        self.publish(|snapshot| {
            snapshot.is_loaded = false;
            snapshot.title.clear();
            snapshot.player_state = PlayerState::Paused;
        });
        self.emit(PlaybackEvent::Reset);
    }

    /// Toggle play/pause, then checkpoint progress
    ///
    /// No-op when unloaded.
    pub async fn play_pause(&mut self) -> Result<()> {
        let Some(track) = self.loaded.as_mut() else {
            return Ok(());
        };

        track.decoder.play_pause().await?;
        let playing = track.decoder.is_playing();

        self.save_progress().await?;
        self.set_state(PlayerState::from_playing(playing));
        Ok(())
    }

    /// Seek to `milliseconds`, then checkpoint progress
    ///
    /// No-op when unloaded. Decoder errors are returned as reported.
    pub async fn seek(&mut self, milliseconds: i64) -> Result<()> {
        let Some(track) = self.loaded.as_mut() else {
            return Ok(());
        };

        track.decoder.seek(milliseconds).await?;
        self.save_progress().await
    }

    /// Seek by `delta` milliseconds, clamped to the track bounds
    ///
    /// No-op when unloaded. Does not checkpoint progress.
    pub async fn relative_seek(&mut self, delta: i64) -> Result<()> {
        let Some(track) = self.loaded.as_mut() else {
            return Ok(());
        };

        let target = clamp_seek_target(
            track.decoder.current_time(),
            delta,
            track.decoder.duration(),
        );
        tracing::debug!(delta, target, "Relative seek");
        track.decoder.seek(target).await
    }

    /// Stop the decoder and return to the unloaded state
    ///
    /// No-op when unloaded. The current position is not checkpointed.
    pub async fn reset(&mut self) -> Result<()> {
        let Some(track) = self.loaded.as_mut() else {
            return Ok(());
        };

        track.decoder.stop().await?;

        self.loaded = None;
        self.publish(|snapshot| {
            snapshot.is_loaded = false;
            snapshot.title.clear();
            snapshot.player_state = PlayerState::Paused;
        });
        self.emit(PlaybackEvent::Reset);

        tracing::info!("Player reset");
        Ok(())
    }

    /// Copy the decoder position into the resume state and persist it
    ///
    /// No-op when unloaded.
    pub async fn save_progress(&mut self) -> Result<()> {
        let Some(track) = self.loaded.as_mut() else {
            return Ok(());
        };

        track.progress.current_time = track.decoder.current_time();
        self.repository.save(&track.progress).await?;

        let event = PlaybackEvent::Checkpointed {
            track_id: track.progress.track_id.clone(),
            current_time: track.progress.current_time,
        };
        self.emit(event);
        Ok(())
    }

    /// Resolves once the loaded track has played to its end
    ///
    /// End notifications from handles that were since torn down are
    /// discarded. Never resolves while unloaded. Cancel safe, so it can sit
    /// in a `tokio::select!` next to other input.
    pub async fn track_ended(&mut self) {
        loop {
            let Some(current) = self.loaded.as_ref().map(|track| track.generation) else {
                std::future::pending::<()>().await;
                return;
            };

            match self.ended_rx.recv().await {
                Some(generation) if generation == current => return,
                Some(generation) => {
                    tracing::debug!(generation, current, "Ignoring end of a released track");
                }
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Rewind the finished track and pause
    ///
    /// Call after [`track_ended`](Self::track_ended) resolves.
    pub async fn handle_track_ended(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Ok(());
        }

        tracing::info!(title = %self.title(), "Track ended");
        self.seek(0).await?;
        self.set_state(PlayerState::Paused);
        self.emit(PlaybackEvent::TrackEnded);
        Ok(())
    }

    /// Reload the last opened track
    ///
    /// Returns `Ok(false)` if no track was ever opened and `Ok(true)` once the
    /// last track is loaded.
    ///
    /// # Errors
    ///
    /// Every failure other than a missing last-track pointer is returned,
    /// including [`RepriseError::FileNotFound`] when the file has since gone
    pub async fn load_last_opened_track(&mut self) -> Result<bool> {
        let uri = match self.history.last_track().await {
            Ok(uri) => uri,
            Err(RepriseError::NoStoredData(reason)) => {
                tracing::info!(%reason, "Nothing to resume");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let file = AudioFile::from_uri(uri);
        self.load(&file).await?;
        Ok(true)
    }

    fn set_state(&mut self, state: PlayerState) {
        let changed = self.player_state() != state;
        self.publish(|snapshot| snapshot.player_state = state);
        if changed {
            self.emit(PlaybackEvent::StateChanged(state));
        }
    }

    /// Single mutation entry point for the observable fields
    fn publish(&self, update: impl FnOnce(&mut PlayerSnapshot)) {
        self.snapshot.send_modify(update);
    }

    fn emit(&self, event: PlaybackEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

/// Stop a handle that is being discarded; the caller already has an error
async fn release(decoder: &mut DecoderHandle) {
    if let Err(e) = decoder.stop().await {
        tracing::warn!(uri = decoder.uri(), error = %e, "Failed to stop discarded decoder");
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("snapshot", &*self.snapshot.borrow())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
