//! Dino Run entry point
//!
//! Runs a session headlessly with a simple autopilot and prints the final
//! session snapshot as JSON. Usage: `dino-run [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use dino_run::Settings;
    use dino_run::consts::*;
    use dino_run::headless::HeadlessHost;
    use dino_run::sim::{InputEvent, ObstacleKind, SessionState, ZonePhase};

    /// Frame length at 60 fps
    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Runs to play before stopping
    const MAX_RUNS: u32 = 3;

    /// Pick an input for this frame, if any
    fn autopilot(host: &HeadlessHost, ducking: bool) -> Option<InputEvent> {
        let session = host.session();
        let character = host.character();

        match session.state() {
            SessionState::Idle => {
                // Jump into the sentinel zone to begin
                let sentinel = session.start_zone().phase == ZonePhase::Sentinel;
                (sentinel && character.on_floor).then_some(InputEvent::Jump)
            }
            SessionState::Starting => None,
            SessionState::GameOver => Some(InputEvent::Restart),
            SessionState::Running => {
                let (_, body_max) = character.body_rect();
                let speed = session.metrics().speed;
                let next = session
                    .obstacles()
                    .iter()
                    .filter(|o| o.right() > character.pos.x)
                    .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

                let Some(obstacle) = next else {
                    return ducking.then_some(InputEvent::DuckEnd);
                };
                let gap = obstacle.pos.x - body_max.x;
                let high_flyer = obstacle.kind == ObstacleKind::Flying
                    && obstacle.pos.y < session.config().viewport.y - FLYING_HEIGHTS[0];

                if high_flyer && gap < speed * 20.0 {
                    (!ducking).then_some(InputEvent::DuckStart)
                } else if ducking {
                    Some(InputEvent::DuckEnd)
                } else if gap > 0.0 && gap < speed * 6.0 {
                    Some(InputEvent::Jump)
                } else {
                    None
                }
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Dino Run (headless) starting...");

        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(Path::new(&path)),
            None => Settings::default(),
        };
        let seconds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120);

        let clock_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let mut host = HeadlessHost::new(&settings, clock_seed);
        log::info!("Seed {}", host.session().config().seed);

        let mut ducking = false;
        let mut runs = 0;
        for _ in 0..seconds * 60 {
            let over = host.session().state() == SessionState::GameOver;
            if over {
                runs += 1;
                if runs >= MAX_RUNS {
                    break;
                }
            }

            if let Some(event) = autopilot(&host, ducking) {
                match event {
                    InputEvent::DuckStart => ducking = true,
                    InputEvent::DuckEnd | InputEvent::Restart => ducking = false,
                    InputEvent::Jump => {}
                }
                host.input(event);
            }
            host.frame(FRAME_MS);
        }

        let session = host.session();
        log::info!(
            "Stopped after {} frames: {} runs, best {}",
            host.frames(),
            runs,
            session.high_score().best()
        );

        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize snapshot: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner on wasm; embed the library in a host engine instead
}
