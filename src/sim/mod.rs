//! Deterministic run session module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, physics or platform dependencies; the host is reached only
//!   through probes in and effects out

pub mod effects;
pub mod session;
pub mod spawn;
pub mod state;
pub mod timer;

pub use effects::{Animation, BodyProbe, Effect, Frame, InputEvent, Sound, UiElement};
pub use session::{RunSession, SessionConfig};
pub use spawn::roll_obstacle;
pub use state::{
    Decoration, Hitbox, Obstacle, ObstacleKind, RunMetrics, SessionSnapshot, SessionState,
    StartZone, ZonePhase,
};
pub use timer::{Scheduler, TimerId};
