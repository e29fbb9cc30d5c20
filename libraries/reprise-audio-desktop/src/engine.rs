//! Headless engine and player

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use reprise_core::util::uri_to_path;
use reprise_playback::decoder::INVALID_PATH;
use reprise_playback::{
    Completion, EndedCallback, NativeEngine, NativeError, NativePlayer, PlayerOptions,
};

use crate::probe::probe_duration_ms;
use crate::transport::Transport;

/// The container could not be probed
pub const PREPARE_FAIL: &str = "preparefail";

/// The requested position is invalid
pub const SEEK_FAIL: &str = "seekfail";

/// The player was stopped and can no longer be used
pub const RELEASED: &str = "released";

/// The player has not finished preparing
pub const NOT_PREPARED: &str = "notprepared";

/// Engine that opens local files without an audio device
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessEngine;

impl NativeEngine for HeadlessEngine {
    fn open(
        &self,
        uri: &str,
        options: PlayerOptions,
    ) -> Result<Box<dyn NativePlayer>, NativeError> {
        let path = uri_to_path(uri);
        if !path.is_file() {
            return Err(NativeError::new(
                INVALID_PATH,
                format!("{} is not a readable file", path.display()),
            ));
        }

        tracing::debug!(
            path = %path.display(),
            continues_in_background = options.continues_in_background,
            auto_destroy = options.auto_destroy,
            "Opening headless player"
        );
        Ok(Box::new(HeadlessPlayer::new(path, options)))
    }
}

type SharedCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Shared {
    transport: Mutex<Transport>,
    ended: Mutex<Option<SharedCallback>>,
}

impl Shared {
    fn transport(&self) -> MutexGuard<'_, Transport> {
        self.transport.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ended(&self) -> Option<SharedCallback> {
        self.ended
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// A player session over one local file
pub struct HeadlessPlayer {
    path: PathBuf,
    options: PlayerOptions,
    shared: Arc<Shared>,
}

impl HeadlessPlayer {
    fn new(path: PathBuf, options: PlayerOptions) -> Self {
        Self {
            path,
            options,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Check the player can take transport commands
    fn ready(&self) -> Result<(), NativeError> {
        let transport = self.shared.transport();
        if transport.released {
            Err(NativeError::new(RELEASED, "player was stopped"))
        } else if !transport.prepared {
            Err(NativeError::new(NOT_PREPARED, "player is not prepared"))
        } else {
            Ok(())
        }
    }

    /// Fire `ended` after `remaining` unless the transport moved on
    fn arm_end_timer(&self, run: u64, remaining: Duration) {
        let shared = Arc::clone(&self.shared);
        let auto_destroy = self.options.auto_destroy;

        let spawned = thread::Builder::new()
            .name("headless-end-timer".to_string())
            .spawn(move || {
                thread::sleep(remaining);

                {
                    let mut transport = shared.transport();
                    if transport.run != run || !transport.is_playing() {
                        return;
                    }
                    transport.finish();
                    if auto_destroy {
                        transport.released = true;
                    }
                }

                tracing::debug!("Headless player reached end of track");
                if let Some(callback) = shared.ended() {
                    callback();
                }
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to spawn end timer");
        }
    }
}

/// Report `result` through `done` from a worker thread
fn complete(done: Completion, result: Result<(), NativeError>) {
    let spawned = thread::Builder::new()
        .name("headless-completion".to_string())
        .spawn(move || done(result.err()));

    // On failure `done` is dropped, which the adapter reports as an error
    if let Err(e) = spawned {
        tracing::error!(error = %e, "Failed to spawn completion worker");
    }
}

impl NativePlayer for HeadlessPlayer {
    fn prepare(&mut self, done: Completion) {
        let path = self.path.clone();
        let shared = Arc::clone(&self.shared);

        let spawned = thread::Builder::new()
            .name("headless-prepare".to_string())
            .spawn(move || {
                let result = match probe_duration_ms(&path) {
                    Ok(duration_ms) => {
                        let mut transport = shared.transport();
                        transport.duration_ms = duration_ms;
                        transport.prepared = true;
                        tracing::debug!(path = %path.display(), duration_ms, "Prepared");
                        None
                    }
                    Err(symphonia::core::errors::Error::IoError(e))
                        if e.kind() == std::io::ErrorKind::NotFound =>
                    {
                        Some(NativeError::new(INVALID_PATH, e.to_string()))
                    }
                    Err(e) => Some(NativeError::new(PREPARE_FAIL, e.to_string())),
                };
                done(result);
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "Failed to spawn prepare worker");
        }
    }

    fn play_pause(&mut self, done: Completion) {
        if let Err(e) = self.ready() {
            complete(done, Err(e));
            return;
        }

        let armed = {
            let mut transport = self.shared.transport();
            if transport.is_playing() {
                transport.pause();
                None
            } else {
                Some(transport.play())
            }
        };

        if let Some((run, remaining)) = armed {
            self.arm_end_timer(run, remaining);
        }
        complete(done, Ok(()));
    }

    fn seek(&mut self, position_ms: i64, done: Completion) {
        if let Err(e) = self.ready() {
            complete(done, Err(e));
            return;
        }
        if position_ms < 0 {
            complete(
                done,
                Err(NativeError::new(
                    SEEK_FAIL,
                    format!("cannot seek to negative position {position_ms}"),
                )),
            );
            return;
        }

        let (playing, run, remaining) = {
            let mut transport = self.shared.transport();
            let (run, remaining) = transport.jump(position_ms);
            (transport.is_playing(), run, remaining)
        };

        if playing {
            self.arm_end_timer(run, remaining);
        }
        complete(done, Ok(()));
    }

    fn stop(&mut self, done: Completion) {
        self.shared.transport().release();
        complete(done, Ok(()));
    }

    fn on_ended(&mut self, callback: EndedCallback) {
        *self
            .shared
            .ended
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::from(callback));
    }

    fn current_time(&self) -> i64 {
        self.shared.transport().position()
    }

    fn duration(&self) -> i64 {
        self.shared.transport().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.shared.transport().is_playing()
    }
}

impl std::fmt::Debug for HeadlessPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessPlayer")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
