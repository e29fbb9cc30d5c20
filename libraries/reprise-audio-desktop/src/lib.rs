//! Reprise - Headless Desktop Decoder
//!
//! A [`NativeEngine`](reprise_playback::NativeEngine) for desktop builds and
//! tests that keeps time without producing sound.
//!
//! - `prepare` probes the container with Symphonia to learn the duration
//! - a transport clock tracks the playhead while "playing"
//! - a timer thread fires the end-of-track callback
//!
//! Completion callbacks always run on a worker thread.

mod engine;
mod probe;
mod transport;

pub use engine::{
    HeadlessEngine, HeadlessPlayer, NOT_PREPARED, PREPARE_FAIL, RELEASED, SEEK_FAIL,
};
pub use probe::probe_duration_ms;
