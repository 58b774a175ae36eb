//! Procedural obstacle placement
//!
//! Every roll draws from the session's seeded RNG, so a seed fully determines
//! the obstacle sequence.

use glam::Vec2;
use rand::Rng;

use super::state::{Obstacle, ObstacleKind};
use crate::consts::*;

/// Roll a new obstacle just beyond the right edge of the viewport
///
/// Kind is uniform over 6 ground variants plus the flying obstacle. The lead
/// distance past the edge is uniform in `[SPAWN_LEAD_MIN, SPAWN_LEAD_MAX]` so
/// spacing never settles into a rhythm.
pub fn roll_obstacle<R: Rng>(rng: &mut R, id: u32, viewport: Vec2) -> Obstacle {
    let roll = rng.random_range(1..=ObstacleKind::COUNT);
    let lead = rng.random_range(SPAWN_LEAD_MIN..=SPAWN_LEAD_MAX) as f32;
    let kind = ObstacleKind::from_roll(roll);

    let y = match kind {
        ObstacleKind::Flying => {
            let lift = FLYING_HEIGHTS[rng.random_range(0..FLYING_HEIGHTS.len())];
            viewport.y - lift
        }
        ObstacleKind::Ground { .. } => viewport.y,
    };

    Obstacle {
        id,
        kind,
        pos: Vec2::new(viewport.x + lead, y),
    }
}
