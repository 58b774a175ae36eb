//! Headless host
//!
//! Stands in for the rendering/physics engine so a session can run without a
//! window: a single gravity-driven character body resting on the ground line,
//! AABB overlap checks against the start zone and obstacles, a cooperative
//! timer scheduler, and a record of what would have been shown or played.
//!
//! Frame order matches the engine loop: timers, then physics (with overlap and
//! collider callbacks), then the session's per-frame update.

use std::collections::HashMap;

use glam::Vec2;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{
    Animation, BodyProbe, Effect, Frame, Hitbox, InputEvent, RunSession, Scheduler, Sound,
    StartZone, TimerId, UiElement,
};

/// Axis-aligned rectangle overlap, (min, max) corners
#[inline]
fn overlaps(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> bool {
    a.0.x < b.1.x && a.1.x > b.0.x && a.0.y < b.1.y && a.1.y > b.0.y
}

/// The player's physics body
#[derive(Debug, Clone)]
pub struct Character {
    /// Bottom-left corner of the body (feet)
    pub pos: Vec2,
    pub velocity: Vec2,
    pub hitbox: Hitbox,
    pub on_floor: bool,
    /// Absolute vertical displacement in the last physics step
    pub last_dy: f32,
}

impl Character {
    fn new(floor: f32) -> Self {
        Self {
            pos: Vec2::new(0.0, floor),
            velocity: Vec2::ZERO,
            hitbox: Hitbox::STANDING,
            on_floor: true,
            last_dy: 0.0,
        }
    }

    /// Collision rectangle; the box shrinks from the top when ducking
    pub fn body_rect(&self) -> (Vec2, Vec2) {
        (
            Vec2::new(self.pos.x, self.pos.y - self.hitbox.height),
            Vec2::new(self.pos.x + self.hitbox.width, self.pos.y),
        )
    }

    /// Integrate one step of `dt` seconds under gravity, landing on `floor`
    fn step(&mut self, dt: f32, floor: f32) {
        let prev_y = self.pos.y;
        self.pos.x += self.velocity.x * dt;
        self.pos.y += self.velocity.y * dt + 0.5 * GRAVITY * dt * dt;
        self.velocity.y += GRAVITY * dt;

        if self.pos.y >= floor {
            self.pos.y = floor;
            self.velocity.y = 0.0;
            self.on_floor = true;
        } else {
            self.on_floor = false;
        }
        self.last_dy = (self.pos.y - prev_y).abs();
    }
}

/// What the HUD would currently show
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub score_text: String,
    pub high_score_text: String,
    pub high_score_x: f32,
    pub ground_width: f32,
    /// Milestone flashes played
    pub flashes: u32,
    alphas: HashMap<UiElement, f32>,
}

impl Hud {
    pub fn alpha(&self, element: UiElement) -> f32 {
        self.alphas.get(&element).copied().unwrap_or(0.0)
    }
}

/// Engine-free host driving one [`RunSession`]
pub struct HeadlessHost {
    session: RunSession,
    scheduler: Scheduler,
    character: Character,
    /// Start zone while enabled
    start_zone: Option<StartZone>,
    floor: f32,
    physics_paused: bool,
    animations_paused: bool,
    animation: Option<Animation>,
    frame: Option<Frame>,
    /// Looping animations on obstacle sprites, by obstacle id
    obstacle_animations: HashMap<u32, Animation>,
    hud: Hud,
    volume: f32,
    sounds: Vec<Sound>,
    frames: u64,
}

impl HeadlessHost {
    pub fn new(settings: &Settings, fallback_seed: u64) -> Self {
        let session = RunSession::new(settings.session_config(fallback_seed));
        let floor = session.config().viewport.y;
        let mut host = Self {
            start_zone: Some(*session.start_zone()),
            session,
            scheduler: Scheduler::new(),
            character: Character::new(floor),
            floor,
            physics_paused: false,
            animations_paused: false,
            animation: None,
            frame: None,
            obstacle_animations: HashMap::new(),
            hud: Hud {
                score_text: crate::format_score(0),
                high_score_text: crate::format_score(0),
                high_score_x: settings.width - HIGH_SCORE_INITIAL_INSET,
                ground_width: INITIAL_GROUND_WIDTH,
                ..Default::default()
            },
            volume: settings.effective_volume(),
            sounds: Vec::new(),
            frames: 0,
        };
        host.apply_effects();
        host
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut RunSession {
        &mut self.session
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    /// Sounds played so far, oldest first
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    /// Animation looping on an obstacle sprite
    pub fn obstacle_animation(&self, id: u32) -> Option<Animation> {
        self.obstacle_animations.get(&id).copied()
    }

    /// Still frame currently shown, if no animation is playing over it
    pub fn shown_frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn physics_paused(&self) -> bool {
        self.physics_paused
    }

    pub fn animations_paused(&self) -> bool {
        self.animations_paused
    }

    pub fn timer_active(&self, timer: TimerId) -> bool {
        self.scheduler.is_active(timer)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn probe(&self) -> BodyProbe {
        BodyProbe {
            on_floor: self.character.on_floor,
            velocity: self.character.velocity,
            delta_abs_y: self.character.last_dy,
        }
    }

    /// Deliver a discrete input event
    pub fn input(&mut self, event: InputEvent) {
        let probe = self.probe();
        self.session.handle_input(event, &probe);
        self.apply_effects();
    }

    /// Run one frame of `dt_ms` milliseconds
    pub fn frame(&mut self, dt_ms: f32) {
        self.frames += 1;

        self.scheduler.advance(dt_ms);
        while let Some(timer) = self.scheduler.pop_due() {
            match timer {
                TimerId::IntroRamp => self.session.on_intro_step(),
                TimerId::ScoreTick => self.session.on_score_tick(),
            }
            self.apply_effects();
        }

        if !self.physics_paused {
            self.character.step(dt_ms / 1000.0, self.floor);
            self.check_start_zone();
            self.check_obstacles();
        }

        let probe = self.probe();
        self.session.on_tick(dt_ms, &probe);
        self.apply_effects();
    }

    fn check_start_zone(&mut self) {
        let Some(zone) = self.start_zone else {
            return;
        };
        if overlaps(self.character.body_rect(), zone.rect()) {
            self.session.on_start_trigger();
            self.apply_effects();
        }
    }

    fn check_obstacles(&mut self) {
        let body = self.character.body_rect();
        let hit = self
            .session
            .obstacles()
            .iter()
            .any(|o| overlaps(body, o.body_rect()));
        if hit {
            self.session.on_collision();
            self.apply_effects();
        }
    }

    fn apply_effects(&mut self) {
        for effect in self.session.drain_effects() {
            match effect {
                Effect::PlaySound(sound) => {
                    if self.volume > 0.0 {
                        log::trace!("Play {} at {:.2}", sound.key(), self.volume);
                        self.sounds.push(sound);
                    }
                }
                Effect::PlayAnimation(animation) => {
                    self.animation = Some(animation);
                    self.frame = None;
                }
                Effect::StopAnimation => self.animation = None,
                Effect::ShowFrame(frame) => self.frame = Some(frame),
                Effect::SetHitbox(hitbox) => self.character.hitbox = hitbox,
                Effect::SetVelocity { x, y } => {
                    if let Some(x) = x {
                        self.character.velocity.x = x;
                    }
                    if let Some(y) = y {
                        self.character.velocity.y = y;
                        if y < 0.0 {
                            self.character.on_floor = false;
                        }
                    }
                }
                Effect::PausePhysics => self.physics_paused = true,
                Effect::ResumePhysics => self.physics_paused = false,
                Effect::PauseAnimations => self.animations_paused = true,
                Effect::ResumeAnimations => self.animations_paused = false,
                Effect::SetAlpha { target, alpha } => {
                    self.hud.alphas.insert(target, alpha);
                }
                Effect::FlashScore { .. } => self.hud.flashes += 1,
                Effect::SetScoreText(text) => self.hud.score_text = text,
                Effect::SetHighScoreText { text, x } => {
                    self.hud.high_score_text = text;
                    self.hud.high_score_x = x;
                }
                Effect::SetGroundWidth(width) => self.hud.ground_width = width,
                Effect::StartTimer { timer, delay_ms } => self.scheduler.start(timer, delay_ms),
                Effect::CancelTimer(timer) => {
                    self.scheduler.cancel(timer);
                }
                Effect::MoveStartZone(pos) => {
                    let zone = self.start_zone.get_or_insert_with(StartZone::default);
                    zone.pos = pos;
                }
                Effect::DisableStartZone => self.start_zone = None,
                Effect::ObstacleSpawned(obstacle) => {
                    log::trace!("Host sprite {} #{}", obstacle.kind.sprite(), obstacle.id);
                }
                Effect::PlayObstacleAnimation { id, animation } => {
                    log::trace!(
                        "Host sprite #{} plays {} at {} fps",
                        id,
                        animation.key(),
                        animation.frame_rate()
                    );
                    self.obstacle_animations.insert(id, animation);
                }
                Effect::ObstacleRecycled { id } => {
                    log::trace!("Host sprite #{} pooled", id);
                    self.obstacle_animations.remove(&id);
                }
                Effect::ClearObstacles => {
                    log::trace!("Host sprites cleared");
                    self.obstacle_animations.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ObstacleKind, SessionState};

    const DT: f32 = 1000.0 / 60.0;

    fn host() -> HeadlessHost {
        let settings = Settings {
            seed: Some(2024),
            ..Default::default()
        };
        HeadlessHost::new(&settings, 0)
    }

    /// Jump into the start zone and run frames until the intro ramp finishes
    fn started_host() -> HeadlessHost {
        let mut host = host();
        host.input(InputEvent::Jump);
        for _ in 0..300 {
            if host.session().state() == SessionState::Running {
                break;
            }
            host.frame(DT);
        }
        assert_eq!(host.session().state(), SessionState::Running);
        host
    }

    #[test]
    fn test_score_timer_requested_on_construction() {
        let host = host();
        assert!(host.timer_active(TimerId::ScoreTick));
        assert!(!host.timer_active(TimerId::IntroRamp));
    }

    #[test]
    fn test_idle_until_start_zone() {
        let mut host = host();
        for _ in 0..120 {
            host.frame(DT);
        }
        assert_eq!(host.session().state(), SessionState::Idle);
        assert_eq!(host.session().metrics().score, 0);
    }

    #[test]
    fn test_jump_starts_intro_then_running() {
        let mut host = host();
        host.input(InputEvent::Jump);
        assert_eq!(host.sounds(), &[Sound::Jump]);

        let mut saw_starting = false;
        for _ in 0..300 {
            host.frame(DT);
            match host.session().state() {
                SessionState::Starting => saw_starting = true,
                SessionState::Running => break,
                _ => {}
            }
        }

        assert!(saw_starting);
        assert_eq!(host.session().state(), SessionState::Running);
        assert_eq!(host.hud().alpha(UiElement::Score), 1.0);
        assert_eq!(host.hud().alpha(UiElement::Environment), 1.0);
        assert_eq!(host.hud().ground_width, VIEWPORT_WIDTH);
        assert_eq!(host.character().velocity.x, 0.0);
        assert!(!host.timer_active(TimerId::IntroRamp));
    }

    #[test]
    fn test_jump_blocked_during_intro() {
        let mut host = host();
        host.input(InputEvent::Jump);
        while host.session().state() != SessionState::Starting {
            host.frame(DT);
            assert!(host.frames() < 300);
        }
        // Land and pick up the run-in velocity
        while !host.character().on_floor || host.character().velocity.x == 0.0 {
            host.frame(DT);
            assert!(host.frames() < 300);
        }
        assert_eq!(host.session().state(), SessionState::Starting);
        assert_eq!(host.character().velocity.x, INTRO_RUN_VELOCITY);

        host.input(InputEvent::Jump);
        assert_eq!(host.sounds(), &[Sound::Jump]);
        assert_eq!(host.character().velocity.y, 0.0);
        assert_eq!(host.session().state(), SessionState::Starting);
    }

    #[test]
    fn test_flying_obstacles_flap_until_cleared() {
        let mut host = started_host();
        for _ in 0..100 {
            host.session_mut().place_obstacle();
        }
        host.apply_effects();

        let obstacles = host.session().obstacles().to_vec();
        assert!(obstacles.iter().any(|o| o.kind == ObstacleKind::Flying));
        for obstacle in &obstacles {
            let expected = (obstacle.kind == ObstacleKind::Flying).then_some(Animation::Flap);
            assert_eq!(host.obstacle_animation(obstacle.id), expected);
        }

        host.session_mut().on_collision();
        host.input(InputEvent::Restart);
        assert!(obstacles.iter().all(|o| host.obstacle_animation(o.id).is_none()));
    }

    #[test]
    fn test_score_ticks_at_ten_hz() {
        let mut host = started_host();
        // One second of frames
        for _ in 0..60 {
            host.frame(DT);
        }
        let score = host.session().metrics().score;
        assert!((9..=11).contains(&score), "score {} after one second", score);
        assert_eq!(host.hud().score_text, crate::format_score(score));
    }

    #[test]
    fn test_collision_ends_run_and_restart_resumes() {
        let mut host = started_host();
        host.session_mut().place_obstacle();

        for _ in 0..1_000 {
            host.frame(DT);
            if host.session().state() == SessionState::GameOver {
                break;
            }
        }
        assert_eq!(host.session().state(), SessionState::GameOver);
        assert!(host.physics_paused());
        assert!(host.animations_paused());
        assert_eq!(host.shown_frame(), Some(Frame::Hurt));
        assert_eq!(host.hud().alpha(UiElement::GameOverScreen), 1.0);
        assert_eq!(host.hud().alpha(UiElement::HighScore), 1.0);
        assert_eq!(host.sounds().last(), Some(&Sound::Hit));
        let best = host.session().high_score().best();
        assert!(best > 0);
        assert_eq!(host.hud().high_score_text, format!("HI {}", crate::format_score(best)));

        // Paused: nothing advances
        let score_text = host.hud().score_text.clone();
        for _ in 0..30 {
            host.frame(DT);
        }
        assert_eq!(host.session().state(), SessionState::GameOver);
        assert_eq!(host.hud().score_text, score_text);

        host.input(InputEvent::Restart);
        assert_eq!(host.session().state(), SessionState::Running);
        assert!(host.session().obstacles().is_empty());
        assert_eq!(host.session().metrics().score, 0);
        assert!(!host.physics_paused());
        assert_eq!(host.hud().alpha(UiElement::GameOverScreen), 0.0);
    }

    #[test]
    fn test_muted_records_no_sounds() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut host = HeadlessHost::new(&settings, 1);
        host.input(InputEvent::Jump);
        assert!(host.sounds().is_empty());
    }

    #[test]
    fn test_character_lands_on_floor() {
        let mut character = Character::new(VIEWPORT_HEIGHT);
        character.velocity.y = JUMP_VELOCITY;
        character.on_floor = false;

        let mut apex = VIEWPORT_HEIGHT;
        for _ in 0..120 {
            character.step(DT / 1000.0, VIEWPORT_HEIGHT);
            apex = apex.min(character.pos.y);
        }
        assert!(character.on_floor);
        assert_eq!(character.pos.y, VIEWPORT_HEIGHT);
        assert_eq!(character.last_dy, 0.0);
        // v² / 2g = 256
        assert!((VIEWPORT_HEIGHT - apex - 256.0).abs() < 1.0);
    }
}
