//! Game state and core simulation types
//!
//! A single `GameState` owns every entity by value. Nothing in here is
//! referenced from anywhere else, so cleanup is plain `retain`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::polar_distance_pc;

/// Index into the configured color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorId(pub usize);

/// Current status of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, waiting for the first primary press
    Init,
    /// Active gameplay, game time advances
    Run,
    /// Game is paused
    Pause,
    /// Just lost; primary is probably still held from gameplay
    Lost,
    /// Primary was released after the loss, a new press restarts
    LostCanRestart,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Init => "INIT",
            GameStatus::Run => "RUN",
            GameStatus::Pause => "PAUSE",
            GameStatus::Lost => "LOST",
            GameStatus::LostCanRestart => "LOST_CAN_RESTART",
        }
    }
}

/// Things that happened during a tick, for the controller and the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    /// Player hit an obstacle of the active color
    Lost { score: u64 },
    /// A fresh game replaced the lost one
    Restarted,
    ColorChanged { color: ColorId, next_color: ColorId },
    BombExploded { bomb_id: u32, destroyed_trail: usize },
}

/// The orbiting player square
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub distance_pc: f32,
    /// Angle around the center, always in [0, 360)
    pub degree: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            distance_pc: config.player.starting_distance_pc.clamp(
                config.lowest_player_distance_pc(),
                config.highest_player_distance_pc(),
            ),
            degree: 0.0,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.distance_pc, self.degree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailStatus {
    /// Just placed, still overlapping the player
    New,
    /// Solid; lethal while its color is active
    Obstacle,
    /// Caught in an explosion, removed at end of frame
    Destroyed,
}

/// A piece of the player's trail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSegment {
    pub id: u32,
    pub distance_pc: f32,
    pub degree: f32,
    pub color: ColorId,
    pub status: TrailStatus,
}

impl TrailSegment {
    pub fn position(&self) -> (f32, f32) {
        (self.distance_pc, self.degree)
    }

    /// Promote to obstacle once the player has fully left it
    pub fn try_promote(&mut self, player: &Player, player_radius_pc: f32) -> bool {
        if self.status != TrailStatus::New {
            return false;
        }
        if polar_distance_pc(self.position(), player.position()) > player_radius_pc * 2.0 {
            self.status = TrailStatus::Obstacle;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BombStatus {
    Charged,
    /// Exploded at the given game time (ms)
    Exploded { at_ms: f64 },
}

/// A bomb waiting to be touched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: u32,
    pub distance_pc: f32,
    pub degree: f32,
    pub status: BombStatus,
}

impl Bomb {
    pub fn position(&self) -> (f32, f32) {
        (self.distance_pc, self.degree)
    }

    pub fn is_charged(&self) -> bool {
        matches!(self.status, BombStatus::Charged)
    }

    /// Charged -> Exploded. Returns false if it already went off.
    pub fn explode(&mut self, game_time_ms: f64) -> bool {
        if !self.is_charged() {
            return false;
        }
        self.status = BombStatus::Exploded { at_ms: game_time_ms };
        true
    }

    /// Whether the blast animation is over and the bomb can go
    pub fn is_expired(&self, game_time_ms: f64, explosion_duration_ms: f64) -> bool {
        match self.status {
            BombStatus::Charged => false,
            BombStatus::Exploded { at_ms } => game_time_ms - at_ms >= explosion_duration_ms,
        }
    }
}

/// Active (lethal) color and the one coming up next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCycle {
    pub color: ColorId,
    pub next_color: ColorId,
    /// Revolutions completed in the current cycle
    pub turn: u32,
}

impl ColorCycle {
    pub fn new<R: Rng + ?Sized>(color: ColorId, palette_len: usize, rng: &mut R) -> Self {
        Self {
            color,
            next_color: choose_color_excluding(color, palette_len, rng),
            turn: 0,
        }
    }

    /// Switch to the next color once `max_turn` revolutions are done
    pub fn advance<R: Rng + ?Sized>(&mut self, max_turn: u32, palette_len: usize, rng: &mut R) -> bool {
        if self.turn <= max_turn {
            return false;
        }
        self.color = self.next_color;
        self.next_color = choose_color_excluding(self.color, palette_len, rng);
        self.turn = 1;
        true
    }
}

/// Uniform pick over the palette, never returning `exclude`
pub fn choose_color_excluding<R: Rng + ?Sized>(
    exclude: ColorId,
    palette_len: usize,
    rng: &mut R,
) -> ColorId {
    if palette_len < 2 {
        return exclude;
    }
    // Draw from the palette minus one slot, then skip over the excluded index
    let pick = rng.random_range(0..palette_len - 1);
    if pick >= exclude.0 {
        ColorId(pick + 1)
    } else {
        ColorId(pick)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub status: GameStatus,
    pub score: u64,
    /// Best score so far, mirrored from the high score store
    pub high_score: Option<u64>,
    pub colors: ColorCycle,
    pub player: Player,
    /// Set when the player touched an active obstacle this run
    pub collision: bool,
    pub trail: Vec<TrailSegment>,
    pub bombs: Vec<Bomb>,
    /// Game time of the last trail segment, `None` until the first one
    pub last_trail_ms: Option<f64>,
    /// Game time of the last bomb spawn
    pub last_bomb_ms: f64,
    next_id: u32,
}

impl GameState {
    /// Fresh game in the `Init` status
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let initial = config.color_id(&config.initial_color).unwrap_or_else(|| {
            log::warn!(
                "Initial color `{}` not in palette, using `{}`",
                config.initial_color,
                config.scheme(ColorId(0)).name
            );
            ColorId(0)
        });

        Self {
            status: GameStatus::Init,
            score: 1,
            high_score: None,
            colors: ColorCycle::new(initial, config.colors.len(), rng),
            player: Player::new(config),
            collision: false,
            trail: Vec::new(),
            bombs: Vec::new(),
            last_trail_ms: None,
            last_bomb_ms: 0.0,
            next_id: 1,
        }
    }

    /// Replace this game with a fresh one, keeping the high score
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        let high_score = self.high_score;
        *self = Self::new(config, rng);
        self.high_score = high_score;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let state = GameState::new(&config, &mut rng);

        assert_eq!(state.status, GameStatus::Init);
        assert_eq!(state.score, 1);
        assert_eq!(state.colors.color, ColorId(0));
        assert_ne!(state.colors.next_color, state.colors.color);
        assert_eq!(state.colors.turn, 0);
        assert_eq!(state.player.distance_pc, 50.0);
        assert_eq!(state.player.degree, 0.0);
        assert!(state.trail.is_empty());
        assert!(state.bombs.is_empty());
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut state = GameState::new(&config, &mut rng);
        state.high_score = Some(99);
        state.score = 40;
        state.collision = true;
        state.status = GameStatus::LostCanRestart;

        state.reset(&config, &mut rng);
        assert_eq!(state.high_score, Some(99));
        assert_eq!(state.score, 1);
        assert!(!state.collision);
        assert_eq!(state.status, GameStatus::Init);
    }

    #[test]
    fn test_choose_color_never_excluded() {
        let mut rng = Pcg32::seed_from_u64(1);
        for exclude in 0..3 {
            for _ in 0..200 {
                let c = choose_color_excluding(ColorId(exclude), 3, &mut rng);
                assert_ne!(c, ColorId(exclude));
                assert!(c.0 < 3);
            }
        }
    }

    #[test]
    fn test_choose_color_covers_others() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[choose_color_excluding(ColorId(1), 3, &mut rng).0] = true;
        }
        assert_eq!(seen, [true, false, true]);
    }

    #[test]
    fn test_color_cycle_advance() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut cycle = ColorCycle::new(ColorId(0), 3, &mut rng);
        let next = cycle.next_color;

        cycle.turn = 2;
        assert!(!cycle.advance(2, 3, &mut rng));
        cycle.turn = 3;
        assert!(cycle.advance(2, 3, &mut rng));
        assert_eq!(cycle.color, next);
        assert_ne!(cycle.next_color, cycle.color);
        assert_eq!(cycle.turn, 1);
    }

    #[test]
    fn test_trail_promotion_once() {
        let config = GameConfig::default();
        let mut segment = TrailSegment {
            id: 1,
            distance_pc: 50.0,
            degree: 0.0,
            color: ColorId(0),
            status: TrailStatus::New,
        };
        let mut player = Player {
            distance_pc: 50.0,
            degree: 0.0,
        };

        assert!(!segment.try_promote(&player, config.player.radius_pc));
        assert_eq!(segment.status, TrailStatus::New);

        player.degree = 30.0;
        assert!(segment.try_promote(&player, config.player.radius_pc));
        assert_eq!(segment.status, TrailStatus::Obstacle);

        // Coming back never reverts it
        player.degree = 0.0;
        assert!(!segment.try_promote(&player, config.player.radius_pc));
        assert_eq!(segment.status, TrailStatus::Obstacle);
    }

    #[test]
    fn test_bomb_explodes_once() {
        let mut bomb = Bomb {
            id: 1,
            distance_pc: 40.0,
            degree: 10.0,
            status: BombStatus::Charged,
        };
        assert!(bomb.explode(1000.0));
        assert!(!bomb.explode(2000.0));
        assert_eq!(bomb.status, BombStatus::Exploded { at_ms: 1000.0 });

        assert!(!bomb.is_expired(1249.0, 250.0));
        assert!(bomb.is_expired(1250.0, 250.0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    proptest! {
        #[test]
        fn next_color_never_repeats(seed in any::<u64>(), len in 2usize..8, cycles in 1usize..40) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut colors = ColorCycle::new(ColorId(seed as usize % len), len, &mut rng);
            for _ in 0..cycles {
                prop_assert_ne!(colors.color, colors.next_color);
                prop_assert!(colors.next_color.0 < len);
                let expected = colors.next_color;
                colors.turn = 3;
                prop_assert!(colors.advance(2, len, &mut rng));
                prop_assert_eq!(colors.color, expected);
                prop_assert_eq!(colors.turn, 1);
            }
        }

        #[test]
        fn cycle_holds_until_turns_exceed_max(max_turn in 0u32..6) {
            let mut rng = Pcg32::seed_from_u64(0);
            let mut colors = ColorCycle::new(ColorId(0), 3, &mut rng);
            for turn in 0..=max_turn {
                colors.turn = turn;
                prop_assert!(!colors.advance(max_turn, 3, &mut rng));
            }
            colors.turn = max_turn + 1;
            prop_assert!(colors.advance(max_turn, 3, &mut rng));
        }

        #[test]
        fn promotion_only_after_leaving(
            distance in 25.0f32..85.0,
            degree in 0.0f32..360.0,
            offset in 0.0f32..20.0,
        ) {
            let player = Player { distance_pc: distance, degree };
            let mut segment = TrailSegment {
                id: 1,
                distance_pc: distance,
                degree: crate::normalize_degree(degree + offset),
                color: ColorId(0),
                status: TrailStatus::New,
            };
            let apart = polar_distance_pc(segment.position(), player.position());
            let promoted = segment.try_promote(&player, 2.5);
            prop_assert_eq!(promoted, apart > 5.0);
            // Never demoted
            prop_assert!(!segment.try_promote(&player, 2.5));
        }
    }
}
