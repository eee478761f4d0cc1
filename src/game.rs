//! Frame controller
//!
//! Owns the state record, clock, RNG and high score store. The host calls
//! [`Game::frame`] once per animation callback.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{ConfigError, GameConfig};
use crate::highscore::{HighScoreStore, record_score};
use crate::sim::{FrameTime, GameClock, GameEvent, GameState, TickInput, tick};

pub struct Game {
    pub state: GameState,
    pub config: GameConfig,
    pub input: TickInput,
    clock: GameClock,
    rng: Pcg32,
    store: Box<dyn HighScoreStore>,
    last_frame: FrameTime,
}

impl Game {
    /// New game in `Init`, seeded for reproducibility. Rejects configs that
    /// fail [`GameConfig::validate`].
    pub fn new(
        config: GameConfig,
        seed: u64,
        store: Box<dyn HighScoreStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = GameState::new(&config, &mut rng);
        state.high_score = store.get_high_score();
        log::info!(
            "Game created (seed {}, high score {:?})",
            seed,
            state.high_score
        );

        Ok(Self {
            state,
            config,
            input: TickInput::default(),
            clock: GameClock::new(),
            rng,
            store,
            last_frame: FrameTime::default(),
        })
    }

    /// Advance one host frame; `timestamp_ms` is the host's monotonic clock
    pub fn frame(&mut self, timestamp_ms: f64) -> Vec<GameEvent> {
        let frame = self.clock.advance(timestamp_ms, self.state.status);
        let events = tick(
            &mut self.state,
            &self.config,
            &mut self.input,
            frame,
            &mut self.rng,
        );
        self.last_frame = frame;
        self.apply_events(&events);

        events
    }

    /// Controller-side effects of simulation events
    fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Lost { score } => {
                    let best = record_score(self.store.as_mut(), *score);
                    self.state.high_score = Some(best);
                }
                GameEvent::Restarted => {
                    self.clock.reset_game_time();
                    self.last_frame = FrameTime::default();
                }
                _ => {}
            }
        }
    }

    /// Timing of the most recent frame
    pub fn last_frame(&self) -> FrameTime {
        self.last_frame
    }

    pub fn game_time_ms(&self) -> f64 {
        self.clock.game_time_ms()
    }
}
