//! Run session state machine
//!
//! Owns session state, run metrics, obstacles and the high score. Reacts to the
//! host's stimuli (frame tick, collision, input, start zone, timers) and queues
//! [`Effect`]s for the host to apply. No engine types cross this boundary.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Animation, BodyProbe, Effect, Frame, InputEvent, Sound, UiElement};
use super::spawn::roll_obstacle;
use super::state::{
    Decoration, Hitbox, Obstacle, ObstacleKind, RunMetrics, SessionSnapshot, SessionState,
    StartZone, ZonePhase,
};
use super::timer::TimerId;
use crate::consts::*;
use crate::highscores::{HighScore, format_score};

/// Construction parameters for a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Viewport size in pixels; the ground line is at `viewport.y`
    pub viewport: Vec2,
    /// RNG seed for obstacle rolls
    pub seed: u64,
    /// Blink the score on milestones
    pub milestone_flash: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            seed: 0,
            milestone_flash: true,
        }
    }
}

impl SessionConfig {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            seed,
            ..Default::default()
        }
    }
}

/// What the character sprite is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pose {
    Animating(Animation),
    Still(Frame),
}

/// One play session: every run between construction and drop
#[derive(Debug, Clone)]
pub struct RunSession {
    config: SessionConfig,
    state: SessionState,
    metrics: RunMetrics,
    high_score: HighScore,
    rng: Pcg32,
    /// Active obstacles in spawn order
    obstacles: Vec<Obstacle>,
    decorations: Vec<Decoration>,
    start_zone: StartZone,
    /// Requested character hitbox
    hitbox: Hitbox,
    /// Ground tile width, grown by the intro ramp
    scroll_width: f32,
    /// Ground tile scroll position (visual only)
    ground_offset: f32,
    pose: Option<Pose>,
    next_id: u32,
    effects: Vec<Effect>,
}

impl RunSession {
    /// Create a session in `Idle`. The score timer is requested immediately.
    pub fn new(config: SessionConfig) -> Self {
        log::info!(
            "Run session created ({}x{}, seed {})",
            config.viewport.x,
            config.viewport.y,
            config.seed
        );
        Self {
            config,
            state: SessionState::Idle,
            metrics: RunMetrics::default(),
            high_score: HighScore::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            obstacles: Vec::new(),
            decorations: Decoration::initial_layout(config.viewport.x),
            start_zone: StartZone::default(),
            hitbox: Hitbox::STANDING,
            scroll_width: INITIAL_GROUND_WIDTH,
            ground_offset: 0.0,
            pose: None,
            next_id: 1,
            effects: vec![Effect::StartTimer {
                timer: TimerId::ScoreTick,
                delay_ms: SCORE_TICK_MS,
            }],
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn start_zone(&self) -> &StartZone {
        &self.start_zone
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    pub fn scroll_width(&self) -> f32 {
        self.scroll_width
    }

    pub fn ground_offset(&self) -> f32 {
        self.ground_offset
    }

    /// Current score as displayed
    pub fn score_text(&self) -> String {
        format_score(self.metrics.score)
    }

    /// Take all queued effects, oldest first
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            metrics: self.metrics,
            high_score: self.high_score.best(),
            scroll_width: self.scroll_width,
            ground_offset: self.ground_offset,
            obstacles: self.obstacles.clone(),
            decorations: self.decorations.clone(),
            start_zone: self.start_zone,
        }
    }

    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            log::info!("Session {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
        }
    }

    /// Update the character pose, emitting only on change
    fn set_pose(&mut self, pose: Pose) {
        if self.pose == Some(pose) {
            return;
        }
        match pose {
            Pose::Animating(animation) => self.emit(Effect::PlayAnimation(animation)),
            Pose::Still(frame) => {
                if matches!(self.pose, Some(Pose::Animating(_))) {
                    self.emit(Effect::StopAnimation);
                }
                self.emit(Effect::ShowFrame(frame));
            }
        }
        self.pose = Some(pose);
    }

    fn set_hitbox(&mut self, hitbox: Hitbox) {
        self.hitbox = hitbox;
        self.emit(Effect::SetHitbox(hitbox));
    }

    // === Lifecycle ===

    /// Character overlapped the start zone
    ///
    /// The first overlap happens at the sentinel position and only moves the zone
    /// down to the ground line. The next one begins the intro ramp.
    pub fn on_start_trigger(&mut self) {
        if self.state != SessionState::Idle {
            log::trace!("Start trigger ignored in {}", self.state.as_str());
            return;
        }
        match self.start_zone.phase {
            ZonePhase::Sentinel => {
                self.start_zone.pos = Vec2::new(0.0, self.config.viewport.y);
                self.start_zone.phase = ZonePhase::Armed;
                self.emit(Effect::MoveStartZone(self.start_zone.pos));
                log::debug!("Start zone armed at ground line");
            }
            ZonePhase::Armed => {
                self.start_zone.phase = ZonePhase::Disabled;
                self.emit(Effect::DisableStartZone);
                self.set_state(SessionState::Starting);
                self.emit(Effect::StartTimer {
                    timer: TimerId::IntroRamp,
                    delay_ms: INTRO_STEP_MS,
                });
            }
            ZonePhase::Disabled => {}
        }
    }

    /// One 60 Hz intro ramp step
    pub fn on_intro_step(&mut self) {
        if self.state != SessionState::Starting {
            log::trace!("Intro step ignored in {}", self.state.as_str());
            return;
        }

        self.emit(Effect::SetVelocity {
            x: Some(INTRO_RUN_VELOCITY),
            y: None,
        });
        self.set_pose(Pose::Animating(Animation::Run));

        let target = self.config.viewport.x;
        if self.scroll_width < target {
            self.scroll_width += INTRO_WIDTH_STEP;
        }

        if self.scroll_width < target {
            self.emit(Effect::SetGroundWidth(self.scroll_width));
        } else {
            self.scroll_width = target;
            self.emit(Effect::SetGroundWidth(target));
            self.emit(Effect::CancelTimer(TimerId::IntroRamp));
            self.emit(Effect::SetVelocity {
                x: Some(0.0),
                y: None,
            });
            self.set_state(SessionState::Running);
            self.emit(Effect::SetAlpha {
                target: UiElement::Score,
                alpha: 1.0,
            });
            self.emit(Effect::SetAlpha {
                target: UiElement::Environment,
                alpha: 1.0,
            });
        }
    }

    /// Character hit an obstacle: end the run
    pub fn on_collision(&mut self) {
        if self.state != SessionState::Running {
            log::trace!("Collision ignored in {}", self.state.as_str());
            return;
        }

        let score = self.metrics.score;
        let x = HighScore::display_x(self.config.viewport.x, &format_score(score));
        self.high_score.record(score);
        self.emit(Effect::SetHighScoreText {
            text: self.high_score.display_text(),
            x,
        });
        self.emit(Effect::SetAlpha {
            target: UiElement::HighScore,
            alpha: 1.0,
        });

        self.emit(Effect::PausePhysics);
        self.emit(Effect::PauseAnimations);
        self.set_pose(Pose::Still(Frame::Hurt));

        self.set_state(SessionState::GameOver);
        log::info!(
            "Game over: score {} at speed {:.2} (best {})",
            score,
            self.metrics.speed,
            self.high_score.best()
        );
        self.metrics.reset();

        self.emit(Effect::SetAlpha {
            target: UiElement::GameOverScreen,
            alpha: 1.0,
        });
        self.emit(Effect::PlaySound(Sound::Hit));
    }

    // === Per-frame update ===

    /// Advance one frame of `delta_ms` milliseconds
    pub fn on_tick(&mut self, delta_ms: f32, probe: &BodyProbe) {
        if self.state != SessionState::Running {
            return;
        }

        let speed = self.metrics.speed;
        self.ground_offset += speed;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= speed;
        }
        for decoration in &mut self.decorations {
            decoration.pos.x -= DECORATION_SPEED;
        }

        self.metrics.respawn_accumulator += delta_ms * speed * RESPAWN_RATE;
        if self.metrics.respawn_accumulator >= RESPAWN_THRESHOLD {
            self.place_obstacle();
            self.metrics.respawn_accumulator = 0.0;
        }

        self.recycle();
        self.update_pose(probe);
    }

    /// Place one obstacle off-screen right. Returns its id, or `None` outside `Running`.
    pub fn place_obstacle(&mut self) -> Option<u32> {
        if self.state != SessionState::Running {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let obstacle = roll_obstacle(&mut self.rng, id, self.config.viewport);
        log::debug!(
            "Spawned {} #{} at x={}",
            obstacle.kind.sprite(),
            id,
            obstacle.pos.x
        );
        self.obstacles.push(obstacle);
        self.emit(Effect::ObstacleSpawned(obstacle));
        if obstacle.kind == ObstacleKind::Flying {
            self.emit(Effect::PlayObstacleAnimation {
                id,
                animation: Animation::Flap,
            });
        }
        Some(id)
    }

    /// Drop obstacles that left the screen; wrap decorations back to the right
    fn recycle(&mut self) {
        let mut recycled = Vec::new();
        self.obstacles.retain(|o| {
            let gone = o.right() < 0.0;
            if gone {
                recycled.push(o.id);
            }
            !gone
        });
        for id in recycled {
            log::debug!("Recycled obstacle #{}", id);
            self.emit(Effect::ObstacleRecycled { id });
        }

        let wrap_x = self.config.viewport.x + DECORATION_WRAP_MARGIN;
        for decoration in &mut self.decorations {
            if decoration.right() < 0.0 {
                decoration.pos.x = wrap_x;
            }
        }
    }

    fn update_pose(&mut self, probe: &BodyProbe) {
        let pose = if probe.delta_abs_y > 0.0 {
            Pose::Still(Frame::Jump)
        } else if self.hitbox.is_ducking() {
            Pose::Animating(Animation::Duck)
        } else {
            Pose::Animating(Animation::Run)
        };
        self.set_pose(pose);
    }

    // === Scoring ===

    /// 10 Hz score tick
    pub fn on_score_tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }

        self.metrics.score += 1;
        self.metrics.speed += SPEED_PER_SCORE_TICK;

        if self.metrics.score % MILESTONE_INTERVAL == 0 {
            log::debug!("Milestone reached: {}", self.metrics.score);
            self.emit(Effect::PlaySound(Sound::Reach));
            if self.config.milestone_flash {
                self.emit(Effect::FlashScore {
                    duration_ms: FLASH_DURATION_MS,
                    repeat: FLASH_REPEAT,
                });
            }
        }

        self.emit(Effect::SetScoreText(self.score_text()));
    }

    // === Input ===

    pub fn handle_input(&mut self, event: InputEvent, probe: &BodyProbe) {
        match event {
            InputEvent::Jump => self.jump(probe),
            InputEvent::DuckStart => self.duck_start(probe),
            InputEvent::DuckEnd => self.duck_end(),
            InputEvent::Restart => self.restart(),
        }
    }

    fn jump(&mut self, probe: &BodyProbe) {
        // Forward velocity is only ever non-zero during the intro run-in
        if !probe.on_floor || probe.velocity.x != 0.0 {
            log::trace!("Jump ignored");
            return;
        }

        self.emit(Effect::PlaySound(Sound::Jump));
        self.set_hitbox(Hitbox::STANDING);
        self.emit(Effect::SetVelocity {
            x: None,
            y: Some(JUMP_VELOCITY),
        });
        self.set_pose(Pose::Still(Frame::Jump));
    }

    fn duck_start(&mut self, probe: &BodyProbe) {
        if !probe.on_floor || self.state != SessionState::Running {
            return;
        }
        self.set_hitbox(Hitbox::DUCKING);
    }

    fn duck_end(&mut self) {
        // Keep the idle pose until the first run is underway
        if self.metrics.score == 0 && self.state != SessionState::Running {
            return;
        }
        self.set_hitbox(Hitbox::STANDING);
    }

    fn restart(&mut self) {
        if self.state != SessionState::GameOver {
            log::trace!("Restart ignored in {}", self.state.as_str());
            return;
        }

        self.emit(Effect::SetVelocity {
            x: None,
            y: Some(0.0),
        });
        self.set_hitbox(Hitbox::STANDING);
        self.emit(Effect::ResumePhysics);

        self.obstacles.clear();
        self.emit(Effect::ClearObstacles);
        self.metrics.reset();

        self.set_state(SessionState::Running);
        self.emit(Effect::SetAlpha {
            target: UiElement::GameOverScreen,
            alpha: 0.0,
        });
        self.emit(Effect::ResumeAnimations);
        self.pose = None;
    }
}
