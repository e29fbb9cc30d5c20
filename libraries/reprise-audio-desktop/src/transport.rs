//! Transport clock
//!
//! The playhead is `offset_ms` plus the time elapsed since `started_at`,
//! clamped to the track. Every start, pause or jump bumps `run`, so a timer
//! armed for an earlier run can tell it is stale.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub(crate) struct Transport {
    pub duration_ms: i64,
    pub offset_ms: i64,
    pub started_at: Option<Instant>,
    pub run: u64,
    pub prepared: bool,
    pub released: bool,
}

impl Transport {
    pub fn position(&self) -> i64 {
        let elapsed = self
            .started_at
            .map_or(0, |started| started.elapsed().as_millis() as i64);
        (self.offset_ms + elapsed).clamp(0, self.duration_ms.max(0))
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start the clock, returning the new run and the time left to the end
    pub fn play(&mut self) -> (u64, Duration) {
        self.offset_ms = self.position();
        self.started_at = Some(Instant::now());
        self.run += 1;
        (self.run, self.remaining())
    }

    pub fn pause(&mut self) {
        self.offset_ms = self.position();
        self.started_at = None;
        self.run += 1;
    }

    /// Move the playhead, keeping the play/pause condition
    pub fn jump(&mut self, position_ms: i64) -> (u64, Duration) {
        self.offset_ms = position_ms.clamp(0, self.duration_ms.max(0));
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
        self.run += 1;
        (self.run, self.remaining())
    }

    /// Park the playhead at the end
    pub fn finish(&mut self) {
        self.offset_ms = self.duration_ms;
        self.started_at = None;
        self.run += 1;
    }

    pub fn release(&mut self) {
        self.offset_ms = 0;
        self.started_at = None;
        self.released = true;
        self.run += 1;
    }

    fn remaining(&self) -> Duration {
        Duration::from_millis((self.duration_ms - self.position()).max(0) as u64)
    }
}
