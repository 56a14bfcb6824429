pub mod engine;
pub mod readout;
pub mod trail;

pub use engine::{FrameSnapshot, PlaybackEngine};
pub use readout::FrameReadout;
pub use trail::{TrailBuffer, DEFAULT_TRAIL_LEN};

use std::time::Instant;
use thiserror::Error;

/// Speed multipliers offered by the controls
pub const ALLOWED_SPEEDS: [f64; 5] = [0.25, 0.5, 1.0, 2.0, 4.0];

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub speed: f64, // 1.0 = recorded rate, 2.0 = twice as fast
    pub trail_len: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            trail_len: DEFAULT_TRAIL_LEN,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Invalid playback speed {0}: must be positive and finite")]
    InvalidSpeed(f64),
}

/// Monotonic time source for the playback tick
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock used by the application
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
