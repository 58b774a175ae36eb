//! Session state and core simulation types
//!
//! Everything a run session owns lives here. Positions follow the host's
//! screen convention: x grows right, y grows down, ground line at viewport height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// Before the start zone fires
    #[default]
    Idle,
    /// Intro ramp widening the ground to full viewport width
    Starting,
    /// Active gameplay
    Running,
    /// Collision occurred, simulation paused until restart
    GameOver,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::Starting => "Starting",
            SessionState::Running => "Running",
            SessionState::GameOver => "GameOver",
        }
    }
}

/// Difficulty and score counters for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Scroll speed (pixels per frame), never below `BASE_SPEED`
    pub speed: f32,
    /// Spawn timer, reset to 0 on every placement
    pub respawn_accumulator: f32,
    pub score: u32,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self {
            speed: BASE_SPEED,
            respawn_accumulator: 0.0,
            score: 0,
        }
    }
}

impl RunMetrics {
    /// Reset to base values for a fresh run
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Collision box relative to a sprite: size plus downward offset from the sprite top
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
    pub offset_y: f32,
}

impl Hitbox {
    /// Full standing character box
    pub const STANDING: Hitbox = Hitbox {
        width: CHARACTER_WIDTH,
        height: CHARACTER_STAND_HEIGHT,
        offset_y: 0.0,
    };

    /// Crouched character box, hugging the ground
    pub const DUCKING: Hitbox = Hitbox {
        width: CHARACTER_WIDTH,
        height: CHARACTER_DUCK_HEIGHT,
        offset_y: CHARACTER_DUCK_OFFSET_Y,
    };

    /// Heights at or below the duck height count as crouched
    #[inline]
    pub fn is_ducking(&self) -> bool {
        self.height <= CHARACTER_DUCK_HEIGHT
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// One of six ground sprites (variant 1..=6)
    Ground { variant: u8 },
    /// Flapping bird
    Flying,
}

impl ObstacleKind {
    /// Number of distinct kinds a spawn roll chooses from
    pub const COUNT: u8 = 7;

    /// Map a roll in 1..=7 to a kind: 1-6 ground variants, 7 flying
    pub fn from_roll(roll: u8) -> Self {
        if roll >= Self::COUNT {
            ObstacleKind::Flying
        } else {
            ObstacleKind::Ground {
                variant: roll.max(1),
            }
        }
    }

    /// Sprite key the host renders this kind with
    pub fn sprite(&self) -> &'static str {
        match self {
            ObstacleKind::Ground { variant: 1 } => "obstacle-1",
            ObstacleKind::Ground { variant: 2 } => "obstacle-2",
            ObstacleKind::Ground { variant: 3 } => "obstacle-3",
            ObstacleKind::Ground { variant: 4 } => "obstacle-4",
            ObstacleKind::Ground { variant: 5 } => "obstacle-5",
            ObstacleKind::Ground { .. } => "obstacle-6",
            ObstacleKind::Flying => "enemy-bird",
        }
    }

    /// Sprite size in pixels
    pub fn sprite_size(&self) -> Vec2 {
        match self {
            ObstacleKind::Ground { variant: 1 } => Vec2::new(34.0, 70.0),
            ObstacleKind::Ground { variant: 2 } => Vec2::new(68.0, 70.0),
            ObstacleKind::Ground { variant: 3 } => Vec2::new(102.0, 70.0),
            ObstacleKind::Ground { variant: 4 } => Vec2::new(50.0, 96.0),
            ObstacleKind::Ground { variant: 5 } => Vec2::new(100.0, 96.0),
            ObstacleKind::Ground { .. } => Vec2::new(150.0, 96.0),
            ObstacleKind::Flying => Vec2::new(92.0, 77.0),
        }
    }

    /// Collision box: flying boxes are trimmed to 2/3 height, ground boxes nudged down
    pub fn hitbox(&self) -> Hitbox {
        let size = self.sprite_size();
        match self {
            ObstacleKind::Flying => Hitbox {
                width: size.x,
                height: size.y / FLYING_HITBOX_DIVISOR,
                offset_y: 0.0,
            },
            ObstacleKind::Ground { .. } => Hitbox {
                width: size.x,
                height: size.y,
                offset_y: GROUND_HITBOX_OFFSET_Y,
            },
        }
    }
}

/// An obstacle entity, anchored at its bottom-left corner and immovable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Bottom-left corner
    pub pos: Vec2,
}

impl Obstacle {
    /// Right edge of the sprite
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.kind.sprite_size().x
    }

    /// Collision rectangle as (min, max) corners
    pub fn body_rect(&self) -> (Vec2, Vec2) {
        let hitbox = self.kind.hitbox();
        let top = self.pos.y - self.kind.sprite_size().y + hitbox.offset_y;
        (
            Vec2::new(self.pos.x, top),
            Vec2::new(self.pos.x + hitbox.width, top + hitbox.height),
        )
    }
}

/// Looping background decoration (cloud), centre anchored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub width: f32,
}

impl Decoration {
    pub fn cloud(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width: CLOUD_WIDTH,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Initial cloud layout for a viewport width
    pub fn initial_layout(viewport_width: f32) -> Vec<Decoration> {
        vec![
            Decoration::cloud(viewport_width / 2.0, 170.0),
            Decoration::cloud(viewport_width - 80.0, 80.0),
            Decoration::cloud(viewport_width / 1.3, 100.0),
        ]
    }
}

/// Start zone arming: one-shot trigger that must be displaced before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePhase {
    /// Still at its pre-placed sentinel position; the first overlap only relocates it
    Sentinel,
    /// Relocated to the ground line, next overlap starts the intro
    Armed,
    /// Fired
    Disabled,
}

/// Invisible zone that begins the intro when the character enters it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartZone {
    /// Bottom-left corner
    pub pos: Vec2,
    pub phase: ZonePhase,
}

impl Default for StartZone {
    fn default() -> Self {
        Self {
            pos: Vec2::new(0.0, START_ZONE_SENTINEL_Y),
            phase: ZonePhase::Sentinel,
        }
    }
}

impl StartZone {
    /// Overlap rectangle as (min, max) corners
    pub fn rect(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.pos.x, self.pos.y - START_ZONE_HEIGHT),
            Vec2::new(self.pos.x + START_ZONE_WIDTH, self.pos.y),
        )
    }
}

/// Read-only view of a session for inspection/debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub metrics: RunMetrics,
    pub high_score: u32,
    pub scroll_width: f32,
    pub ground_offset: f32,
    pub obstacles: Vec<Obstacle>,
    pub decorations: Vec<Decoration>,
    pub start_zone: StartZone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_maps_to_kind() {
        for roll in 1..=6 {
            assert_eq!(
                ObstacleKind::from_roll(roll),
                ObstacleKind::Ground { variant: roll }
            );
        }
        assert_eq!(ObstacleKind::from_roll(7), ObstacleKind::Flying);
    }

    #[test]
    fn test_flying_hitbox_is_two_thirds() {
        let hitbox = ObstacleKind::Flying.hitbox();
        let sprite = ObstacleKind::Flying.sprite_size();
        assert!((hitbox.height - sprite.y * 2.0 / 3.0).abs() < 1e-4);
        assert_eq!(hitbox.offset_y, 0.0);
    }

    #[test]
    fn test_ground_hitbox_offset() {
        for variant in 1..=6 {
            let kind = ObstacleKind::Ground { variant };
            assert_eq!(kind.hitbox().offset_y, GROUND_HITBOX_OFFSET_Y);
            assert_eq!(kind.hitbox().height, kind.sprite_size().y);
        }
    }

    #[test]
    fn test_obstacle_body_rect() {
        let obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::Ground { variant: 1 },
            pos: Vec2::new(100.0, 340.0),
        };
        let (min, max) = obstacle.body_rect();
        assert_eq!(min, Vec2::new(100.0, 280.0));
        assert_eq!(max, Vec2::new(134.0, 350.0));
        assert_eq!(obstacle.right(), 134.0);
    }

    #[test]
    fn test_start_zone_rect() {
        let zone = StartZone::default();
        let (min, max) = zone.rect();
        assert_eq!(min, Vec2::new(0.0, START_ZONE_SENTINEL_Y - START_ZONE_HEIGHT));
        assert_eq!(max, Vec2::new(START_ZONE_WIDTH, START_ZONE_SENTINEL_Y));
    }

    #[test]
    fn test_hitbox_ducking() {
        assert!(Hitbox::DUCKING.is_ducking());
        assert!(!Hitbox::STANDING.is_ducking());
    }

    #[test]
    fn test_metrics_reset() {
        let mut metrics = RunMetrics {
            speed: 14.2,
            respawn_accumulator: 900.0,
            score: 420,
        };
        metrics.reset();
        assert_eq!(metrics, RunMetrics::default());
        assert_eq!(metrics.speed, BASE_SPEED);
    }
}
