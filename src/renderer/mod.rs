//! Rendering
//!
//! The game state is turned into a flat list of draw commands by a pure
//! function; the host (a 2D canvas on the web) executes them.

pub mod color;
pub mod commands;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use color::Rgb;
pub use commands::{DrawCommand, Stroke, TextAlign, Viewport, build_frame};
