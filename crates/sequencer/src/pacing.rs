//! How far ahead of the channel clock playback is allowed to run.

use std::time::Duration;

/// Lookahead window for [`crate::Sequence::play_and_wait`].
///
/// Notes are sent until one ends past `now + lookahead - processing_margin`;
/// playback then sleeps until that horizon and recomputes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    pub lookahead_secs: f64,
    pub processing_margin_secs: f64,
}

impl Pacing {
    pub fn window(&self) -> f64 {
        self.lookahead_secs - self.processing_margin_secs
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            lookahead_secs: 1.0,
            processing_margin_secs: 0.1,
        }
    }
}

/// Blocks the caller. Swapped out in tests for a simulated clock.
pub trait Sleeper {
    fn sleep(&mut self, seconds: f64);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, seconds: f64) {
        if let Ok(duration) = Duration::try_from_secs_f64(seconds) {
            std::thread::sleep(duration);
        }
    }
}
