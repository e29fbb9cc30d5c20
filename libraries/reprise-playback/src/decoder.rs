//! Decoder handle
//!
//! Native engines expose an error-first callback API. [`DecoderHandle`] wraps
//! one open player and turns each callback into an awaitable [`Result`], so
//! the controller never deals with callbacks directly.
//!
//! Error translation happens here: an invalid-path failure while opening or
//! preparing becomes [`RepriseError::FileNotFound`]; everything else surfaces
//! as [`RepriseError::Decoder`] with the engine's code and message unchanged.

use reprise_core::{RepriseError, Result};
use tokio::sync::oneshot;

/// Error code engines use when the location cannot be opened
pub const INVALID_PATH: &str = "invalidpath";

/// Code reported when an engine drops a completion without calling it
pub const DROPPED: &str = "dropped";

/// Error reported by a native engine callback
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct NativeError {
    /// Engine error code
    pub code: String,
    /// Human readable message
    pub message: String,
}

impl NativeError {
    /// Create an error with the given code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether this is the invalid-path signature
    pub fn is_invalid_path(&self) -> bool {
        self.code == INVALID_PATH
    }

    fn dropped() -> Self {
        Self::new(DROPPED, "completion dropped without a result")
    }
}

/// Options passed to [`NativeEngine::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Keep playing while the application is in the background
    pub continues_in_background: bool,
    /// Release the player automatically once playback ends
    pub auto_destroy: bool,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            continues_in_background: true,
            auto_destroy: false,
        }
    }
}

/// Error-first completion callback
pub type Completion = Box<dyn FnOnce(Option<NativeError>) + Send>;

/// End-of-track callback
pub type EndedCallback = Box<dyn Fn() + Send + Sync>;

/// A native player session for one open file
///
/// Every operation reports its outcome through the supplied [`Completion`],
/// which must be called exactly once.
pub trait NativePlayer: Send + Sync {
    /// Load the file and read its duration
    fn prepare(&mut self, done: Completion);

    /// Toggle between playing and paused
    fn play_pause(&mut self, done: Completion);

    /// Move the playhead to `position_ms`
    fn seek(&mut self, position_ms: i64, done: Completion);

    /// Stop playback and release the file
    fn stop(&mut self, done: Completion);

    /// Register the end-of-track callback, replacing any previous one
    fn on_ended(&mut self, callback: EndedCallback);

    /// Playhead position in milliseconds
    fn current_time(&self) -> i64;

    /// Track length in milliseconds, fixed once prepared
    fn duration(&self) -> i64;

    /// Whether the player is currently playing
    fn is_playing(&self) -> bool;
}

/// Factory for [`NativePlayer`] sessions
pub trait NativeEngine: Send + Sync {
    /// Open a player for `uri`
    ///
    /// # Errors
    ///
    /// Returns an error with code [`INVALID_PATH`] if the location cannot be opened
    fn open(
        &self,
        uri: &str,
        options: PlayerOptions,
    ) -> std::result::Result<Box<dyn NativePlayer>, NativeError>;
}

/// Async adapter over one [`NativePlayer`]
pub struct DecoderHandle {
    uri: String,
    player: Box<dyn NativePlayer>,
}

impl DecoderHandle {
    /// Open `uri` with `engine`
    ///
    /// # Errors
    ///
    /// Returns [`RepriseError::FileNotFound`] for an invalid path and
    /// [`RepriseError::Decoder`] for any other engine failure
    pub fn open(engine: &dyn NativeEngine, uri: &str, options: PlayerOptions) -> Result<Self> {
        let player = engine
            .open(uri, options)
            .map_err(|e| open_error(uri, e))?;

        Ok(Self {
            uri: uri.to_string(),
            player,
        })
    }

    /// Location this handle was opened with
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Wait for the player to finish preparing
    pub async fn prepare(&mut self) -> Result<()> {
        let rx = dispatch(|done| self.player.prepare(done));
        outcome(rx).await.map_err(|e| open_error(&self.uri, e))
    }

    /// Toggle play/pause and wait for the engine to confirm
    pub async fn play_pause(&mut self) -> Result<()> {
        let rx = dispatch(|done| self.player.play_pause(done));
        outcome(rx).await.map_err(|e| operation_error("play_pause", e))
    }

    /// Seek to `position_ms` and wait for the engine to confirm
    pub async fn seek(&mut self, position_ms: i64) -> Result<()> {
        let rx = dispatch(|done| self.player.seek(position_ms, done));
        outcome(rx).await.map_err(|e| operation_error("seek", e))
    }

    /// Stop playback and wait for the engine to confirm
    pub async fn stop(&mut self) -> Result<()> {
        let rx = dispatch(|done| self.player.stop(done));
        outcome(rx).await.map_err(|e| operation_error("stop", e))
    }

    /// Register the end-of-track callback
    pub fn on_ended(&mut self, callback: EndedCallback) {
        self.player.on_ended(callback);
    }

    /// Playhead position in milliseconds
    pub fn current_time(&self) -> i64 {
        self.player.current_time()
    }

    /// Track length in milliseconds
    pub fn duration(&self) -> i64 {
        self.player.duration()
    }

    /// Whether the player is currently playing
    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }
}

impl std::fmt::Debug for DecoderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderHandle")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

/// Hand `op` a completion wired to a oneshot channel
fn dispatch(op: impl FnOnce(Completion)) -> oneshot::Receiver<Option<NativeError>> {
    let (tx, rx) = oneshot::channel();
    op(Box::new(move |err: Option<NativeError>| {
        // Receiver gone means the caller stopped waiting
        let _ = tx.send(err);
    }));
    rx
}

async fn outcome(rx: oneshot::Receiver<Option<NativeError>>) -> std::result::Result<(), NativeError> {
    match rx.await {
        Ok(None) => Ok(()),
        Ok(Some(err)) => Err(err),
        Err(_) => Err(NativeError::dropped()),
    }
}

fn open_error(uri: &str, err: NativeError) -> RepriseError {
    if err.is_invalid_path() {
        tracing::warn!(uri, message = %err.message, "Decoder could not open file");
        RepriseError::file_not_found(uri)
    } else {
        tracing::error!(uri, code = %err.code, message = %err.message, "Decoder failed to open file");
        RepriseError::decoder(err.code, err.message)
    }
}

fn operation_error(operation: &str, err: NativeError) -> RepriseError {
    tracing::error!(operation, code = %err.code, message = %err.message, "Decoder operation failed");
    RepriseError::decoder(err.code, err.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Player that answers every call from a scripted outcome
    #[derive(Default)]
    struct ScriptedPlayer {
        outcome: Option<NativeError>,
        drop_completions: bool,
        position: Arc<Mutex<i64>>,
    }

    impl ScriptedPlayer {
        fn finish(&self, done: Completion) {
            if !self.drop_completions {
                done(self.outcome.clone());
            }
        }
    }

    impl NativePlayer for ScriptedPlayer {
        fn prepare(&mut self, done: Completion) {
            self.finish(done);
        }
        fn play_pause(&mut self, done: Completion) {
            self.finish(done);
        }
        fn seek(&mut self, position_ms: i64, done: Completion) {
            *self.position.lock().unwrap() = position_ms;
            self.finish(done);
        }
        fn stop(&mut self, done: Completion) {
            self.finish(done);
        }
        fn on_ended(&mut self, _callback: EndedCallback) {}
        fn current_time(&self) -> i64 {
            *self.position.lock().unwrap()
        }
        fn duration(&self) -> i64 {
            1000
        }
        fn is_playing(&self) -> bool {
            false
        }
    }

    fn handle(player: ScriptedPlayer) -> DecoderHandle {
        DecoderHandle {
            uri: "/music/a.mp3".to_string(),
            player: Box::new(player),
        }
    }

    struct RefusingEngine;

    impl NativeEngine for RefusingEngine {
        fn open(
            &self,
            _uri: &str,
            _options: PlayerOptions,
        ) -> std::result::Result<Box<dyn NativePlayer>, NativeError> {
            Err(NativeError::new(INVALID_PATH, "no such file"))
        }
    }

    #[tokio::test]
    async fn successful_callback_resolves_ok() {
        let mut decoder = handle(ScriptedPlayer::default());
        decoder.seek(250).await.unwrap();
        assert_eq!(decoder.current_time(), 250);
    }

    #[test]
    fn open_with_invalid_path_is_file_not_found() {
        let err = DecoderHandle::open(&RefusingEngine, "/gone.mp3", PlayerOptions::default())
            .unwrap_err();
        assert!(matches!(err, RepriseError::FileNotFound(ref uri) if uri == "/gone.mp3"));
    }

    #[tokio::test]
    async fn prepare_with_invalid_path_is_file_not_found() {
        let mut decoder = handle(ScriptedPlayer {
            outcome: Some(NativeError::new(INVALID_PATH, "vanished")),
            ..ScriptedPlayer::default()
        });

        let err = decoder.prepare().await.unwrap_err();
        assert!(matches!(err, RepriseError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn seek_never_translates_invalid_path() {
        let mut decoder = handle(ScriptedPlayer {
            outcome: Some(NativeError::new(INVALID_PATH, "vanished")),
            ..ScriptedPlayer::default()
        });

        let err = decoder.seek(10).await.unwrap_err();
        assert!(matches!(err, RepriseError::Decoder { ref code, .. } if code == INVALID_PATH));
    }

    #[tokio::test]
    async fn other_errors_pass_through_unchanged() {
        let mut decoder = handle(ScriptedPlayer {
            outcome: Some(NativeError::new("E_BUSY", "engine busy")),
            ..ScriptedPlayer::default()
        });

        match decoder.play_pause().await.unwrap_err() {
            RepriseError::Decoder { code, message } => {
                assert_eq!(code, "E_BUSY");
                assert_eq!(message, "engine busy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropped_completion_is_reported() {
        let mut decoder = handle(ScriptedPlayer {
            drop_completions: true,
            ..ScriptedPlayer::default()
        });

        let err = decoder.stop().await.unwrap_err();
        assert!(matches!(err, RepriseError::Decoder { ref code, .. } if code == DROPPED));
    }

    #[test]
    fn default_options_keep_the_player_alive_in_background() {
        let options = PlayerOptions::default();
        assert!(options.continues_in_background);
        assert!(!options.auto_destroy);
    }
}
