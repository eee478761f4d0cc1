//! Pausable game clock
//!
//! Converts host animation-frame timestamps into game time, which only
//! advances while the game is running.

use serde::{Deserialize, Serialize};

use super::state::GameStatus;
use crate::consts::MAX_FRAME_DELTA_MS;

/// Timing for one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Wall-clock time since the previous frame, after clamping (ms)
    pub clamped_delta_ms: f64,
    /// Game time advanced since the previous frame (ms), zero unless running
    pub game_delta_ms: f64,
    /// Total game time (ms)
    pub game_time_ms: f64,
}

impl FrameTime {
    pub fn seconds_passed(&self) -> f32 {
        (self.game_delta_ms / 1000.0) as f32
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    last_timestamp_ms: Option<f64>,
    game_time_ms: f64,
    last_game_time_ms: f64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a host timestamp; game time only accumulates while `status` is `Run`
    pub fn advance(&mut self, timestamp_ms: f64, status: GameStatus) -> FrameTime {
        let clamped_delta_ms = match self.last_timestamp_ms {
            Some(last) => (timestamp_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(timestamp_ms);

        if status == GameStatus::Run {
            self.game_time_ms += clamped_delta_ms;
        }
        let game_delta_ms = self.game_time_ms - self.last_game_time_ms;
        self.last_game_time_ms = self.game_time_ms;

        FrameTime {
            clamped_delta_ms,
            game_delta_ms,
            game_time_ms: self.game_time_ms,
        }
    }

    /// Start game time over (new game); the wall-clock reference is kept
    pub fn reset_game_time(&mut self) {
        self.game_time_ms = 0.0;
        self.last_game_time_ms = 0.0;
    }

    pub fn game_time_ms(&self) -> f64 {
        self.game_time_ms
    }
}
