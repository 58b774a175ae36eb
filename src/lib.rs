//! Dino Run - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic run session (state machine, spawning, scoring)
//! - `highscores`: Session-lifetime best score
//! - `settings`: Runtime configuration
//! - `headless`: Engine-free host that drives a session frame by frame

pub mod headless;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScore, format_score};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 1000.0;
    pub const VIEWPORT_HEIGHT: f32 = 340.0;

    /// Scroll speed at the start of every run (pixels per frame)
    pub const BASE_SPEED: f32 = 10.0;
    /// Speed gained per score tick
    pub const SPEED_PER_SCORE_TICK: f32 = 0.01;

    /// Respawn accumulator gain per (ms × speed)
    pub const RESPAWN_RATE: f32 = 0.08;
    /// Accumulator value that triggers an obstacle placement
    pub const RESPAWN_THRESHOLD: f32 = 1500.0;

    /// Spawn lead distance beyond the right edge of the viewport
    pub const SPAWN_LEAD_MIN: u32 = 600;
    pub const SPAWN_LEAD_MAX: u32 = 900;
    /// Heights above the ground line a flying obstacle can take
    pub const FLYING_HEIGHTS: [f32; 2] = [20.0, 50.0];
    /// Flying hitbox height = sprite height / this
    pub const FLYING_HITBOX_DIVISOR: f32 = 1.5;
    /// Vertical hitbox offset for ground obstacles
    pub const GROUND_HITBOX_OFFSET_Y: f32 = 10.0;

    /// Decorations drift at a fixed rate regardless of run speed (parallax)
    pub const DECORATION_SPEED: f32 = 0.5;
    /// Recycled decorations re-enter this far past the right edge
    pub const DECORATION_WRAP_MARGIN: f32 = 30.0;

    /// Intro ramp timer: 60 Hz
    pub const INTRO_STEP_MS: f32 = 1000.0 / 60.0;
    /// Ground width gained per intro step
    pub const INTRO_WIDTH_STEP: f32 = 17.0 * 2.0;
    /// Forward velocity forced on the character during the intro
    pub const INTRO_RUN_VELOCITY: f32 = 80.0;
    /// Ground tile width before the intro widens it
    pub const INITIAL_GROUND_WIDTH: f32 = 88.0;

    /// Score timer: 10 Hz
    pub const SCORE_TICK_MS: f32 = 1000.0 / 10.0;
    /// Points between milestone effects
    pub const MILESTONE_INTERVAL: u32 = 100;
    /// Score display is zero padded to this many digits
    pub const SCORE_DIGITS: usize = 5;
    /// Width of one score glyph (35px monospace)
    pub const SCORE_GLYPH_WIDTH: f32 = 21.0;
    /// Gap between the high score and score displays after a game over
    pub const HIGH_SCORE_GAP: f32 = 20.0;
    /// High score display sits this far left of the right edge until the first game over
    pub const HIGH_SCORE_INITIAL_INSET: f32 = 200.0;
    /// Milestone flash: one blink duration and repeat count
    pub const FLASH_DURATION_MS: f32 = 100.0;
    pub const FLASH_REPEAT: u32 = 3;

    /// Start zone sentinel height (top of the screen, reachable only by jumping)
    pub const START_ZONE_SENTINEL_Y: f32 = 10.0;
    /// Start zone sprite size (the idle dino frame)
    pub const START_ZONE_WIDTH: f32 = 88.0;
    pub const START_ZONE_HEIGHT: f32 = 94.0;

    /// Character hitbox
    pub const CHARACTER_WIDTH: f32 = 44.0;
    pub const CHARACTER_STAND_HEIGHT: f32 = 92.0;
    pub const CHARACTER_DUCK_HEIGHT: f32 = 58.0;
    pub const CHARACTER_DUCK_OFFSET_Y: f32 = 34.0;

    /// Upward impulse applied on jump (pixels/s, negative is up)
    pub const JUMP_VELOCITY: f32 = -1600.0;
    /// Character gravity (pixels/s²)
    pub const GRAVITY: f32 = 5000.0;

    /// Cloud sprite size
    pub const CLOUD_WIDTH: f32 = 92.0;
    pub const CLOUD_HEIGHT: f32 = 27.0;
}
