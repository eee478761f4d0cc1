//! Collision checks in polar pc space
//!
//! Everything here is a circle-vs-circle distance test on cartesian
//! positions; the player square is treated as a circle of its half size.

use super::state::{Bomb, ColorId, Player, TrailSegment, TrailStatus};
use crate::polar_distance_pc;

/// Whether two polar positions are within `reach_pc` of each other (inclusive)
#[inline]
pub fn within(a: (f32, f32), b: (f32, f32), reach_pc: f32) -> bool {
    polar_distance_pc(a, b) <= reach_pc
}

/// First active-color obstacle the player overlaps, if any
pub fn player_trail_collision<'a>(
    player: &Player,
    trail: &'a [TrailSegment],
    active: ColorId,
    player_radius_pc: f32,
) -> Option<&'a TrailSegment> {
    trail
        .iter()
        .filter(|t| t.status == TrailStatus::Obstacle && t.color == active)
        .find(|t| within(t.position(), player.position(), player_radius_pc * 2.0))
}

/// Whether the player touches a charged bomb
pub fn player_bomb_collision(
    player: &Player,
    bomb: &Bomb,
    player_radius_pc: f32,
    bomb_radius_pc: f32,
) -> bool {
    bomb.is_charged() && within(bomb.position(), player.position(), player_radius_pc + bomb_radius_pc)
}

/// Whether a trail segment is inside the blast of `bomb`
pub fn in_blast(bomb: &Bomb, segment: &TrailSegment, explosion_radius_pc: f32) -> bool {
    within(segment.position(), bomb.position(), explosion_radius_pc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BombStatus;

    fn segment(id: u32, degree: f32, color: usize, status: TrailStatus) -> TrailSegment {
        TrailSegment {
            id,
            distance_pc: 50.0,
            degree,
            color: ColorId(color),
            status,
        }
    }

    #[test]
    fn test_within_is_inclusive() {
        assert!(within((10.0, 0.0), (15.0, 0.0), 5.0));
        assert!(!within((10.0, 0.0), (15.1, 0.0), 5.0));
    }

    #[test]
    fn test_trail_collision_only_active_obstacles() {
        let player = Player {
            distance_pc: 50.0,
            degree: 0.0,
        };
        let trail = [
            segment(1, 0.0, 0, TrailStatus::New),
            segment(2, 0.0, 1, TrailStatus::Obstacle),
            segment(3, 90.0, 0, TrailStatus::Obstacle),
        ];
        assert!(player_trail_collision(&player, &trail, ColorId(0), 2.5).is_none());

        let hit = player_trail_collision(&player, &trail, ColorId(1), 2.5);
        assert_eq!(hit.map(|t| t.id), Some(2));
    }

    #[test]
    fn test_trail_collision_first_match_wins() {
        let player = Player {
            distance_pc: 50.0,
            degree: 0.0,
        };
        let trail = [
            segment(1, 2.0, 0, TrailStatus::Obstacle),
            segment(2, 0.0, 0, TrailStatus::Obstacle),
        ];
        let hit = player_trail_collision(&player, &trail, ColorId(0), 2.5);
        assert_eq!(hit.map(|t| t.id), Some(1));
    }

    #[test]
    fn test_bomb_collision_ignores_exploded() {
        let player = Player {
            distance_pc: 40.0,
            degree: 45.0,
        };
        let mut bomb = Bomb {
            id: 1,
            distance_pc: 40.0,
            degree: 45.0,
            status: BombStatus::Charged,
        };
        assert!(player_bomb_collision(&player, &bomb, 2.5, 1.25));
        bomb.status = BombStatus::Exploded { at_ms: 0.0 };
        assert!(!player_bomb_collision(&player, &bomb, 2.5, 1.25));
    }

    #[test]
    fn test_blast_radius() {
        let bomb = Bomb {
            id: 1,
            distance_pc: 50.0,
            degree: 0.0,
            status: BombStatus::Charged,
        };
        assert!(in_blast(&bomb, &segment(1, 10.0, 2, TrailStatus::Obstacle), 25.0));
        assert!(!in_blast(&bomb, &segment(2, 180.0, 2, TrailStatus::Obstacle), 25.0));
    }
}
