//! Game tuning and color palette
//!
//! Every distance is in pc (percent of the arena radius). Loaded from JSON;
//! missing fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ColorId;

/// Errors produced while loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("palette needs at least two colors, found {0}")]
    TooFewColors(usize),
    #[error("initial color `{0}` is not in the palette")]
    UnknownInitialColor(String),
    #[error("player annulus is empty: lowest {lowest} pc >= highest {highest} pc")]
    EmptyAnnulus { lowest: f32, highest: f32 },
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
}

/// Named color scheme; the whole scene is tinted by the active one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    pub background: String,
    pub field_border: String,
    pub field: String,
    pub center_border: String,
    pub center: String,
    pub player_border: String,
    pub player: String,
    pub trail_border: String,
    pub trail: String,
}

impl ColorScheme {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        background: &str,
        field_border: &str,
        field: &str,
        center_border: &str,
        center: &str,
        player_border: &str,
        player: &str,
        trail_border: &str,
        trail: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            background: background.to_string(),
            field_border: field_border.to_string(),
            field: field.to_string(),
            center_border: center_border.to_string(),
            center: center.to_string(),
            player_border: player_border.to_string(),
            player: player.to_string(),
            trail_border: trail_border.to_string(),
            trail: trail.to_string(),
        }
    }
}

/// Center hub
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    pub radius_pc: f32,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self { radius_pc: 20.0 }
    }
}

/// Outer playing field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub radius_pc: f32,
    /// Stroke width of the field outline; the player stays inside it
    pub border_pc: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            radius_pc: 90.0,
            border_pc: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub starting_distance_pc: f32,
    /// Half the side of the player square, also its collision radius
    pub radius_pc: f32,
    /// Linear orbit speed; degrees/s at 100 pc
    pub velocity: f32,
    /// Outward push per frame while primary is held
    pub boost_pc: f32,
    /// Inward drift per frame
    pub decay_pc: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_distance_pc: 50.0,
            radius_pc: 2.5,
            velocity: 20.0,
            boost_pc: 0.6,
            decay_pc: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Game time between two trail segments
    pub interval_ms: f64,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self { interval_ms: 250.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Game time between two bomb spawns
    pub interval_ms: f64,
    pub radius_pc: f32,
    pub explosion_radius_pc: f32,
    /// How long an exploded bomb stays around for its blast animation
    pub explosion_duration_ms: f64,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0,
            radius_pc: 1.25,
            explosion_radius_pc: 25.0,
            explosion_duration_ms: 250.0,
        }
    }
}

/// Complete game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub colors: Vec<ColorScheme>,
    pub initial_color: String,
    pub center: CenterConfig,
    pub field: FieldConfig,
    pub player: PlayerConfig,
    pub trail: TrailConfig,
    pub bomb: BombConfig,
    /// Revolutions before the active color changes
    pub max_turn: u32,
    /// Score points per second of game time
    pub score_rate: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                ColorScheme::new(
                    "yellow", "#FFF2CC", "#FFC000", "#FFE699", "#FFF2CC", "#FFD966", "#BF9000",
                    "#FFC000", "#FFC305", "#FFD966",
                ),
                ColorScheme::new(
                    "red", "#FFCECD", "#FF7875", "#FF9B99", "#FFE0DF", "#FF7875", "#E9100B",
                    "#F74F4B", "#F86F6C", "#F9827F",
                ),
                ColorScheme::new(
                    "blue", "#DAE3F3", "#4472C4", "#8FAADC", "#DAE3F3", "#4472C4", "#2F5597",
                    "#4472C4", "#5D85CD", "#658BCF",
                ),
            ],
            initial_color: "yellow".to_string(),
            center: CenterConfig::default(),
            field: FieldConfig::default(),
            player: PlayerConfig::default(),
            trail: TrailConfig::default(),
            bomb: BombConfig::default(),
            max_turn: 2,
            score_rate: 1.25,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load a config file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.len() < 2 {
            return Err(ConfigError::TooFewColors(self.colors.len()));
        }
        if self.color_id(&self.initial_color).is_none() {
            return Err(ConfigError::UnknownInitialColor(self.initial_color.clone()));
        }
        let positives: [(&'static str, f64); 6] = [
            ("player.radius_pc", self.player.radius_pc as f64),
            ("player.velocity", self.player.velocity as f64),
            ("trail.interval_ms", self.trail.interval_ms),
            ("bomb.interval_ms", self.bomb.interval_ms),
            ("bomb.radius_pc", self.bomb.radius_pc as f64),
            ("max_turn", self.max_turn as f64),
        ];
        if let Some((name, _)) = positives.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ConfigError::NonPositive(*name));
        }
        let lowest = self.lowest_player_distance_pc();
        let highest = self.highest_player_distance_pc();
        if lowest >= highest {
            return Err(ConfigError::EmptyAnnulus { lowest, highest });
        }
        Ok(())
    }

    /// Palette index for a color name
    pub fn color_id(&self, name: &str) -> Option<ColorId> {
        self.colors.iter().position(|c| c.name == name).map(ColorId)
    }

    /// Color scheme for an id; out-of-range ids fall back to the first scheme
    pub fn scheme(&self, color: ColorId) -> &ColorScheme {
        self.colors.get(color.0).unwrap_or(&self.colors[0])
    }

    /// Innermost legal player distance (touching the center hub)
    pub fn lowest_player_distance_pc(&self) -> f32 {
        self.center.radius_pc + self.player.radius_pc
    }

    /// Outermost legal player distance (touching the field border)
    pub fn highest_player_distance_pc(&self) -> f32 {
        self.field.radius_pc - self.field.border_pc - self.player.radius_pc
    }

    /// Bomb spawn range, keeping the bomb fully inside the annulus
    pub fn bomb_spawn_range_pc(&self) -> (f32, f32) {
        (
            self.center.radius_pc + self.bomb.radius_pc,
            self.field.radius_pc - self.bomb.radius_pc,
        )
    }
}
