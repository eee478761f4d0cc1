//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in through `FrameTime`, never from a system clock
//! - Randomness comes from an injected RNG
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod collision;
pub mod state;
pub mod tick;

pub use clock::{FrameTime, GameClock};
pub use collision::{in_blast, player_bomb_collision, player_trail_collision, within};
pub use state::{
    Bomb, BombStatus, ColorCycle, ColorId, GameEvent, GameState, GameStatus, Player,
    TrailSegment, TrailStatus, choose_color_excluding,
};
pub use tick::{TickInput, tick};
