//! Orbit Trail - a color-cycling orbit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, status machine, entity rules)
//! - `game`: Frame controller tying clock, simulation and persistence together
//! - `renderer`: Pure draw-command builder (the host executes the commands)
//! - `highscore`: High score persistence behind a small trait
//! - `config`: Data-driven game tuning

pub mod config;
pub mod game;
pub mod highscore;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use game::Game;
pub use highscore::{HighScoreStore, MemoryHighScoreStore};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest raw frame delta the clock accepts (ms). Longer gaps (tab in
    /// background, debugger pause) are treated as a single slow frame.
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Frame interval used by the headless native demo (ms)
    pub const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;

    /// Full turn in degrees
    pub const FULL_TURN_DEG: f32 = 360.0;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degree(degree: f32) -> f32 {
    let wrapped = degree.rem_euclid(consts::FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= consts::FULL_TURN_DEG {
        0.0
    } else {
        wrapped
    }
}

#[inline]
pub fn degree_to_radian(degree: f32) -> f32 {
    degree.to_radians()
}

/// Convert polar (distance in pc, angle in degrees) to cartesian pc around the arena center
#[inline]
pub fn polar_pc_to_cartesian(distance_pc: f32, degree: f32) -> Vec2 {
    let theta = degree_to_radian(degree);
    Vec2::new(distance_pc * theta.cos(), distance_pc * theta.sin())
}

/// Cartesian distance between two polar positions (pc)
#[inline]
pub fn polar_distance_pc(a: (f32, f32), b: (f32, f32)) -> f32 {
    polar_pc_to_cartesian(a.0, a.1).distance(polar_pc_to_cartesian(b.0, b.1))
}
