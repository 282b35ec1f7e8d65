//! Monotonic simulation clock
//!
//! Measures wall time since the last reset. The scene uses it to derive a
//! variable step when the caller does not supply one.

use std::time::{Duration, Instant};

/// Monotonic timer with reset
#[derive(Debug, Clone)]
pub struct Clock {
    /// Time of the last reset
    last_reset: Instant,
}

impl Clock {
    /// Create a new clock, already running
    pub fn new() -> Self {
        Self {
            last_reset: Instant::now(),
        }
    }

    /// Restart the measurement from now
    pub fn reset(&mut self) {
        self.last_reset = Instant::now();
    }

    /// Time elapsed since the last reset
    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.last_reset)
    }

    /// Whole microseconds elapsed since the last reset
    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }

    /// Seconds elapsed since the last reset, at microsecond resolution
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_micros() as f32 * 0.000_001
    }

    /// Read the elapsed seconds and reset in one go
    pub fn lap(&mut self) -> f32 {
        let secs = self.elapsed_secs();
        self.reset();
        secs
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
