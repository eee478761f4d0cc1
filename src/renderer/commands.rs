//! Scene description as a flat list of draw commands
//!
//! Built from a read-only view of the game state, in pixels, back to front.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::color::Rgb;
use crate::config::{ColorScheme, GameConfig};
use crate::polar_pc_to_cartesian;
use crate::sim::{BombStatus, GameState, GameStatus};

/// Hidden trail is the trail's own color, saturated, then washed 75% into the field color
const HIDDEN_TRAIL_OPACITY: f32 = 0.75;
const HIDDEN_TRAIL_SATURATE_PCT: f32 = 50.0;
/// Corner rounding of player and trail squares (px)
const SQUARE_CORNER_PX: f32 = 2.0;
const SQUARE_STROKE_PX: f32 = 2.0;
const BOMB_STROKE_PX: f32 = 2.0;

/// Canvas size in pixels; 100 pc is half the width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// pc length -> px length
    pub fn px(&self, pc: f32) -> f32 {
        pc / 100.0 * self.width / 2.0
    }

    /// Polar pc position -> canvas pixel position
    pub fn to_screen(&self, distance_pc: f32, degree: f32) -> Vec2 {
        self.center() + polar_pc_to_cartesian(self.px(distance_pc), degree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Clear { color: Rgb },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    /// Rounded square centered on `center`, rotated clockwise by `rotation_deg`
    Square {
        center: Vec2,
        half_size: f32,
        rotation_deg: f32,
        corner_radius: f32,
        fill: Option<Rgb>,
        stroke: Option<Stroke>,
    },
    Text {
        pos: Vec2,
        text: String,
        size_px: f32,
        align: TextAlign,
        color: Rgb,
    },
}

/// Resolved colors of one palette entry
struct Palette {
    background: Rgb,
    field_border: Rgb,
    field: Rgb,
    center_border: Rgb,
    center: Rgb,
    player_border: Rgb,
    player: Rgb,
    trail_border: Rgb,
    trail: Rgb,
}

impl From<&ColorScheme> for Palette {
    fn from(scheme: &ColorScheme) -> Self {
        Self {
            background: Rgb::from_hex_or_black(&scheme.background),
            field_border: Rgb::from_hex_or_black(&scheme.field_border),
            field: Rgb::from_hex_or_black(&scheme.field),
            center_border: Rgb::from_hex_or_black(&scheme.center_border),
            center: Rgb::from_hex_or_black(&scheme.center),
            player_border: Rgb::from_hex_or_black(&scheme.player_border),
            player: Rgb::from_hex_or_black(&scheme.player),
            trail_border: Rgb::from_hex_or_black(&scheme.trail_border),
            trail: Rgb::from_hex_or_black(&scheme.trail),
        }
    }
}

/// Build the draw list for one frame
pub fn build_frame(
    state: &GameState,
    config: &GameConfig,
    game_time_ms: f64,
    viewport: Viewport,
) -> Vec<DrawCommand> {
    let active = Palette::from(config.scheme(state.colors.color));
    let next = Palette::from(config.scheme(state.colors.next_color));
    let center = viewport.center();
    let mut commands = Vec::with_capacity(8 + state.trail.len() + state.bombs.len());

    commands.push(DrawCommand::Clear {
        color: active.background,
    });

    commands.push(DrawCommand::Circle {
        center,
        radius: viewport.px(config.field.radius_pc),
        fill: Some(active.field),
        stroke: Some(Stroke {
            color: active.field_border,
            width: viewport.px(config.field.border_pc),
        }),
    });
    commands.push(DrawCommand::Circle {
        center,
        radius: viewport.px(config.center.radius_pc),
        fill: Some(active.center),
        stroke: Some(Stroke {
            color: active.center_border,
            width: SQUARE_STROKE_PX,
        }),
    });
    // Turn counter, tinted with the color that comes next
    commands.push(DrawCommand::Text {
        pos: center,
        text: state.colors.turn.to_string(),
        size_px: viewport.px(config.center.radius_pc),
        align: TextAlign::Center,
        color: next.trail,
    });

    let square_half = viewport.px(config.player.radius_pc);

    // Hidden trail first so lethal trail is drawn on top
    for segment in state.trail.iter().filter(|t| t.color != state.colors.color) {
        let own = Palette::from(config.scheme(segment.color));
        commands.push(DrawCommand::Square {
            center: viewport.to_screen(segment.distance_pc, segment.degree),
            half_size: square_half,
            rotation_deg: segment.degree,
            corner_radius: SQUARE_CORNER_PX,
            fill: Some(
                own.player
                    .saturate(HIDDEN_TRAIL_SATURATE_PCT)
                    .overlay(active.field, HIDDEN_TRAIL_OPACITY),
            ),
            stroke: None,
        });
    }
    for segment in state.trail.iter().filter(|t| t.color == state.colors.color) {
        commands.push(DrawCommand::Square {
            center: viewport.to_screen(segment.distance_pc, segment.degree),
            half_size: square_half,
            rotation_deg: segment.degree,
            corner_radius: SQUARE_CORNER_PX,
            fill: Some(active.trail),
            stroke: Some(Stroke {
                color: active.trail_border,
                width: SQUARE_STROKE_PX,
            }),
        });
    }

    for bomb in &state.bombs {
        let pos = viewport.to_screen(bomb.distance_pc, bomb.degree);
        match bomb.status {
            BombStatus::Charged => commands.push(DrawCommand::Circle {
                center: pos,
                radius: viewport.px(config.bomb.radius_pc),
                fill: Some(Rgb::WHITE),
                stroke: None,
            }),
            BombStatus::Exploded { at_ms } => {
                let progress = explosion_progress(game_time_ms - at_ms, config.bomb.explosion_duration_ms);
                commands.push(DrawCommand::Circle {
                    center: pos,
                    radius: viewport.px(config.bomb.explosion_radius_pc) * (progress * FRAC_PI_2).sin(),
                    fill: None,
                    stroke: Some(Stroke {
                        color: Rgb::WHITE,
                        width: BOMB_STROKE_PX,
                    }),
                });
            }
        }
    }

    commands.push(DrawCommand::Square {
        center: viewport.to_screen(state.player.distance_pc, state.player.degree),
        half_size: square_half,
        rotation_deg: state.player.degree,
        corner_radius: SQUARE_CORNER_PX,
        fill: Some(active.player),
        stroke: Some(Stroke {
            color: active.player_border,
            width: SQUARE_STROKE_PX,
        }),
    });

    push_hud(&mut commands, state, &active, viewport);
    commands
}

/// 0 at detonation, 1 when the blast animation is done
fn explosion_progress(elapsed_ms: f64, duration_ms: f64) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0) as f32
}

fn push_hud(commands: &mut Vec<DrawCommand>, state: &GameState, active: &Palette, viewport: Viewport) {
    commands.push(DrawCommand::Text {
        pos: Vec2::new(10.0, 30.0),
        text: format!("Score : {}", state.score),
        size_px: 20.0,
        align: TextAlign::Left,
        color: active.player,
    });
    if let Some(high_score) = state.high_score {
        commands.push(DrawCommand::Text {
            pos: Vec2::new(10.0, 56.0),
            text: format!("Best : {}", high_score),
            size_px: 16.0,
            align: TextAlign::Left,
            color: active.player_border,
        });
    }

    let banner = match state.status {
        GameStatus::Init => Some("Hold space to start"),
        GameStatus::Run => None,
        GameStatus::Pause => Some("Paused"),
        GameStatus::Lost => Some("Game over"),
        GameStatus::LostCanRestart => Some("Game over - press space to restart"),
    };
    if let Some(text) = banner {
        commands.push(DrawCommand::Text {
            pos: Vec2::new(viewport.width / 2.0, viewport.height - 30.0),
            text: text.to_string(),
            size_px: 24.0,
            align: TextAlign::Center,
            color: active.player_border,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bomb, TrailSegment, TrailStatus};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameConfig, GameState) {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let state = GameState::new(&config, &mut rng);
        (config, state)
    }

    #[test]
    fn test_viewport_mapping() {
        let viewport = Viewport::new(800.0, 800.0);
        assert_eq!(viewport.px(100.0), 400.0);
        let p = viewport.to_screen(50.0, 0.0);
        assert!((p.x - 600.0).abs() < 1e-3);
        assert!((p.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_frame_starts_with_background() {
        let (config, state) = setup();
        let commands = build_frame(&state, &config, 0.0, Viewport::new(800.0, 800.0));
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                color: Rgb::from_hex("#FFF2CC").unwrap()
            }
        );
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "Hold space to start"
        )));
    }

    #[test]
    fn test_hidden_trail_drawn_before_obstacles() {
        let (config, mut state) = setup();
        let active = state.colors.color;
        let hidden = state.colors.next_color;
        for (id, color) in [(1, active), (2, hidden)] {
            state.trail.push(TrailSegment {
                id,
                distance_pc: 40.0,
                degree: id as f32 * 30.0,
                color,
                status: TrailStatus::Obstacle,
            });
        }

        let commands = build_frame(&state, &config, 0.0, Viewport::new(800.0, 800.0));
        let squares: Vec<&DrawCommand> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Square { .. }))
            .collect();
        // hidden, obstacle, player
        assert_eq!(squares.len(), 3);
        assert!(matches!(squares[0], DrawCommand::Square { stroke: None, .. }));
        assert!(matches!(squares[1], DrawCommand::Square { stroke: Some(_), .. }));
    }

    #[test]
    fn test_hidden_trail_color() {
        let (config, mut state) = setup();
        let blue = config.color_id("blue").unwrap();
        assert_ne!(state.colors.color, blue);
        state.trail.push(TrailSegment {
            id: 1,
            distance_pc: 40.0,
            degree: 0.0,
            color: blue,
            status: TrailStatus::Obstacle,
        });

        let commands = build_frame(&state, &config, 0.0, Viewport::new(800.0, 800.0));
        let fill = commands.iter().find_map(|c| match c {
            DrawCommand::Square {
                stroke: None, fill, ..
            } => *fill,
            _ => None,
        });
        // #4472C4 saturated to #0961FF, then 75% into the yellow field #FFE699
        assert_eq!(fill, Some(Rgb::new(193, 196, 178)));
    }

    #[test]
    fn test_explosion_ring_grows() {
        let (config, mut state) = setup();
        state.bombs.push(Bomb {
            id: 1,
            distance_pc: 50.0,
            degree: 90.0,
            status: BombStatus::Exploded { at_ms: 1000.0 },
        });
        let viewport = Viewport::new(800.0, 800.0);

        let ring_radius = |time: f64| {
            build_frame(&state, &config, time, viewport)
                .into_iter()
                .find_map(|c| match c {
                    DrawCommand::Circle {
                        radius, fill: None, ..
                    } => Some(radius),
                    _ => None,
                })
                .unwrap()
        };
        assert!(ring_radius(1000.0).abs() < 1e-3);
        assert!(ring_radius(1100.0) < ring_radius(1200.0));
        assert!((ring_radius(1250.0) - viewport.px(25.0)).abs() < 1e-3);
    }

    #[test]
    fn test_high_score_shown_when_known() {
        let (config, mut state) = setup();
        state.high_score = Some(12);
        state.status = GameStatus::Run;
        let commands = build_frame(&state, &config, 0.0, Viewport::new(800.0, 800.0));
        assert!(commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "Best : 12"
        )));
        assert!(!commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { align: TextAlign::Center, size_px, .. } if *size_px == 24.0
        )));
    }
}
