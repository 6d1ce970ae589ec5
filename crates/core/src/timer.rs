//! Frame timer for the host main loop.

use std::time::{Duration, Instant};

/// Counts frames and measures time since the loop started.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    last_tick: Instant,
    frames: u64,
}

impl Timer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Get the total elapsed time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Mark the end of a frame and return the time spent in it.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        self.frames += 1;
        delta
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Mean frame duration, or zero before the first tick.
    pub fn average_frame_time(&self) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        (self.last_tick - self.start).div_f64(self.frames as f64)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
