//! Per-frame simulation tick
//!
//! Advances the entities while running, then applies the status transitions.

use rand::Rng;

use super::clock::FrameTime;
use super::collision::{in_blast, player_bomb_collision, player_trail_collision};
use super::state::{Bomb, BombStatus, GameEvent, GameState, GameStatus, TrailSegment, TrailStatus};
use crate::config::GameConfig;
use crate::normalize_degree;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Primary action held (push outward / start / restart)
    pub primary: bool,
    /// Pause toggle pressed since the last tick; cleared by `tick`
    pub pause: bool,
}

/// Advance the game by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    input: &mut TickInput,
    frame: FrameTime,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.status == GameStatus::Run {
        update_score(state, config, frame);
        update_player(state, config, input, frame);
        update_color(state, config, rng, &mut events);
        update_trail(state, config, frame);
        update_trail_collision(state, config);
        update_bomb_spawn(state, config, frame, rng);
        update_bomb_collision(state, config, frame, &mut events);
        purge(state, config, frame);
    }

    update_status(state, config, input, rng, &mut events);

    // Pause is an edge: whatever the status did with it, it's spent
    input.pause = false;

    events
}

fn update_status<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    input: &TickInput,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let previous = state.status;

    match state.status {
        GameStatus::Init => {
            if input.primary {
                state.status = GameStatus::Run;
                events.push(GameEvent::Started);
            }
        }
        GameStatus::Run => {
            if state.collision {
                state.status = GameStatus::Lost;
                events.push(GameEvent::Lost { score: state.score });
            } else if input.pause {
                state.status = GameStatus::Pause;
                events.push(GameEvent::Paused);
            }
        }
        GameStatus::Pause => {
            if input.pause || input.primary {
                state.status = GameStatus::Run;
                events.push(GameEvent::Resumed);
            }
        }
        GameStatus::Lost => {
            if !input.primary {
                state.status = GameStatus::LostCanRestart;
            }
        }
        GameStatus::LostCanRestart => {
            if input.primary {
                state.reset(config, rng);
                state.status = GameStatus::Run;
                events.push(GameEvent::Restarted);
            }
        }
    }

    if state.status != previous {
        log::info!(
            "Status {} -> {} (score {})",
            previous.as_str(),
            state.status.as_str(),
            state.score
        );
    }
}

fn update_score(state: &mut GameState, config: &GameConfig, frame: FrameTime) {
    state.score = (frame.game_time_ms * config.score_rate / 1000.0).floor() as u64 + 1;
}

fn update_player(state: &mut GameState, config: &GameConfig, input: &TickInput, frame: FrameTime) {
    let player = &mut state.player;

    // Constant linear speed: angular speed scales with 1/radius
    let degree_step =
        config.player.velocity * frame.seconds_passed() / (player.distance_pc / 100.0);
    let degree = normalize_degree(player.degree + degree_step);
    if degree < player.degree {
        state.colors.turn += 1;
    }
    player.degree = degree;

    player.distance_pc -= config.player.decay_pc;
    if input.primary {
        player.distance_pc += config.player.boost_pc;
    }
    player.distance_pc = player.distance_pc.clamp(
        config.lowest_player_distance_pc(),
        config.highest_player_distance_pc(),
    );
}

fn update_color<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    if state.colors.advance(config.max_turn, config.colors.len(), rng) {
        log::debug!(
            "Color -> {}, next {}",
            config.scheme(state.colors.color).name,
            config.scheme(state.colors.next_color).name
        );
        events.push(GameEvent::ColorChanged {
            color: state.colors.color,
            next_color: state.colors.next_color,
        });
    }
}

fn update_trail(state: &mut GameState, config: &GameConfig, frame: FrameTime) {
    let due = state
        .last_trail_ms
        .is_none_or(|last| frame.game_time_ms - last > config.trail.interval_ms);
    if due {
        let id = state.next_entity_id();
        state.trail.push(TrailSegment {
            id,
            distance_pc: state.player.distance_pc,
            degree: state.player.degree,
            color: state.colors.color,
            status: TrailStatus::New,
        });
        state.last_trail_ms = Some(frame.game_time_ms);
    }

    for segment in state.trail.iter_mut() {
        segment.try_promote(&state.player, config.player.radius_pc);
    }
}

fn update_trail_collision(state: &mut GameState, config: &GameConfig) {
    if let Some(segment) = player_trail_collision(
        &state.player,
        &state.trail,
        state.colors.color,
        config.player.radius_pc,
    ) {
        log::debug!("Player hit trail segment {}", segment.id);
        state.collision = true;
    }
}

fn update_bomb_spawn<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    frame: FrameTime,
    rng: &mut R,
) {
    if frame.game_time_ms - state.last_bomb_ms <= config.bomb.interval_ms {
        return;
    }

    let (min, max) = config.bomb_spawn_range_pc();
    let distance_pc = if max > min {
        rng.random_range(min..max)
    } else {
        min
    };
    let degree = rng.random_range(0.0..360.0);

    let id = state.next_entity_id();
    state.bombs.push(Bomb {
        id,
        distance_pc,
        degree,
        status: BombStatus::Charged,
    });
    state.last_bomb_ms = frame.game_time_ms;
}

fn update_bomb_collision(
    state: &mut GameState,
    config: &GameConfig,
    frame: FrameTime,
    events: &mut Vec<GameEvent>,
) {
    // Every touched bomb explodes independently, each clearing its own blast area
    for bomb in state.bombs.iter_mut() {
        if !player_bomb_collision(
            &state.player,
            bomb,
            config.player.radius_pc,
            config.bomb.radius_pc,
        ) {
            continue;
        }
        bomb.explode(frame.game_time_ms);

        let mut destroyed_trail = 0;
        for segment in state.trail.iter_mut() {
            if segment.status != TrailStatus::Destroyed
                && in_blast(bomb, segment, config.bomb.explosion_radius_pc)
            {
                segment.status = TrailStatus::Destroyed;
                destroyed_trail += 1;
            }
        }

        log::debug!("Bomb {} exploded, {} trail destroyed", bomb.id, destroyed_trail);
        events.push(GameEvent::BombExploded {
            bomb_id: bomb.id,
            destroyed_trail,
        });
    }
}

fn purge(state: &mut GameState, config: &GameConfig, frame: FrameTime) {
    state.trail.retain(|t| t.status != TrailStatus::Destroyed);
    state
        .bombs
        .retain(|b| !b.is_expired(frame.game_time_ms, config.bomb.explosion_duration_ms));
}
