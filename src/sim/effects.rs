//! Session boundary types
//!
//! A run session never talks to an engine directly. Physics state comes in as a
//! [`BodyProbe`], input as [`InputEvent`], and everything the host must do comes
//! out as a queue of [`Effect`]s applied in order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Hitbox, Obstacle};
use super::timer::TimerId;

/// Character physics snapshot supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProbe {
    /// Resting on the floor
    pub on_floor: bool,
    /// Current velocity (pixels/s)
    pub velocity: Vec2,
    /// Absolute vertical displacement during the last physics step
    pub delta_abs_y: f32,
}

impl BodyProbe {
    /// Standing still on the ground
    pub fn grounded() -> Self {
        Self {
            on_floor: true,
            velocity: Vec2::ZERO,
            delta_abs_y: 0.0,
        }
    }

    /// Mid-air, moving vertically at `vy`
    pub fn airborne(vy: f32) -> Self {
        Self {
            on_floor: false,
            velocity: Vec2::new(0.0, vy),
            delta_abs_y: vy.abs().max(1.0),
        }
    }
}

/// Discrete input events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Jump,
    DuckStart,
    DuckEnd,
    /// Tap/click on the restart button
    Restart,
}

impl InputEvent {
    /// Map a key name and press state to an event
    pub fn from_key(key: &str, pressed: bool) -> Option<Self> {
        match (key.to_lowercase().as_str(), pressed) {
            ("space" | " " | "arrowup" | "up", true) => Some(InputEvent::Jump),
            ("arrowdown" | "down", true) => Some(InputEvent::DuckStart),
            ("arrowdown" | "down", false) => Some(InputEvent::DuckEnd),
            _ => None,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Jump,
    Hit,
    /// Every 100th point
    Reach,
}

impl Sound {
    pub fn key(&self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::Hit => "hit",
            Sound::Reach => "reach",
        }
    }
}

/// Looping animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    /// Character run cycle
    Run,
    /// Character crouched run cycle
    Duck,
    /// Flying obstacle flap
    Flap,
}

impl Animation {
    pub fn key(&self) -> &'static str {
        match self {
            Animation::Run => "dino-run",
            Animation::Duck => "dino-down-anim",
            Animation::Flap => "enemy-dino-fly",
        }
    }

    /// Playback rate in frames per second
    pub fn frame_rate(&self) -> u32 {
        match self {
            Animation::Run | Animation::Duck => 10,
            Animation::Flap => 6,
        }
    }
}

/// Still character frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    /// Airborne/idle frame
    Jump,
    /// Shown after a collision
    Hurt,
}

/// HUD elements the session fades in and out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiElement {
    Score,
    HighScore,
    /// Parallax clouds
    Environment,
    GameOverScreen,
}

/// Something the host must do on behalf of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    PlaySound(Sound),
    /// Play a looping character animation (ignored if already playing)
    PlayAnimation(Animation),
    StopAnimation,
    ShowFrame(Frame),
    SetHitbox(Hitbox),
    /// Set character velocity components; `None` leaves a component untouched
    SetVelocity { x: Option<f32>, y: Option<f32> },
    PausePhysics,
    ResumePhysics,
    PauseAnimations,
    ResumeAnimations,
    SetAlpha { target: UiElement, alpha: f32 },
    /// Blink the score display `repeat + 1` times
    FlashScore { duration_ms: f32, repeat: u32 },
    SetScoreText(String),
    SetHighScoreText { text: String, x: f32 },
    SetGroundWidth(f32),
    StartTimer { timer: TimerId, delay_ms: f32 },
    CancelTimer(TimerId),
    MoveStartZone(Vec2),
    DisableStartZone,
    /// New obstacle placed
    ObstacleSpawned(Obstacle),
    /// Loop an animation on one obstacle sprite
    PlayObstacleAnimation { id: u32, animation: Animation },
    ObstacleRecycled { id: u32 },
    ClearObstacles,
}
