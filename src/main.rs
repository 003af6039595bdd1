//! Scroll Runner headless driver
//!
//! Runs the simulation in demo mode at a simulated 60 Hz host refresh and
//! reports the result. Useful for soak-testing balance changes.
//!
//! Environment:
//! - `SCROLL_RUNNER_SETTINGS`: JSON tuning file (defaults otherwise)
//! - `SCROLL_RUNNER_SCORES`: JSON scoreboard file (in-memory otherwise)
//! - `SCROLL_RUNNER_SEED`: run seed (wall clock otherwise)
//! - `SCROLL_RUNNER_RUNS`: number of runs to play (default 3)

use std::time::{SystemTime, UNIX_EPOCH};

use scroll_runner::consts::{MAX_SUBSTEPS, SIM_DT};
use scroll_runner::persistence::JsonFileStore;
use scroll_runner::sim::{GameEvent, GameWorld, RunState, TickInput, tick};
use scroll_runner::{ConfigError, Frame, HighScores, Scoreboard, Settings};

/// Simulated host refresh interval
const HOST_FRAME: f32 = 1.0 / 60.0;
/// Give up on a run after this many host frames
const MAX_FRAMES_PER_RUN: u32 = 60 * 60 * 10;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Fixed-timestep host loop
struct Driver {
    world: GameWorld,
    accumulator: f32,
    input: TickInput,
}

impl Driver {
    /// Run simulation ticks for one host frame
    fn update(&mut self, frame_dt: f32, scores: &mut dyn Scoreboard) -> Vec<GameEvent> {
        let dt = frame_dt.min(0.1);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input.timestamp_ms = now_ms();
            let snapshot = tick(&mut self.world, &self.input, SIM_DT, scores);
            events.extend(snapshot.events);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.taps = 0;
        }
        events
    }

    /// Move on to the next run: tap to restart after game over, or abandon
    /// a run that is still alive (a tap would only jump)
    fn next_run(&mut self, scores: &mut dyn Scoreboard) -> Result<(), ConfigError> {
        if self.world.run_state == RunState::GameOver {
            self.input.taps = 1;
            self.update(HOST_FRAME, scores);
        } else {
            log::warn!("Abandoning live run (seed {})", self.world.seed);
            let next_seed = self.world.seed.wrapping_add(1);
            self.world = GameWorld::new(self.world.settings.clone(), self.world.frame, next_seed)?;
            self.accumulator = 0.0;
            self.input.taps = 0;
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Scroll Runner (headless) starting...");

    let settings = match std::env::var("SCROLL_RUNNER_SETTINGS") {
        Ok(path) => Settings::load(path)?,
        Err(_) => Settings::default(),
    };
    let frame = Frame::new(400.0, 600.0)?;
    let seed = env_parse("SCROLL_RUNNER_SEED").unwrap_or_else(now_ms);
    let runs: u32 = env_parse("SCROLL_RUNNER_RUNS").unwrap_or(3);

    let mut scores: Box<dyn Scoreboard> = match std::env::var("SCROLL_RUNNER_SCORES") {
        Ok(path) => Box::new(JsonFileStore::open(path)?),
        Err(_) => Box::new(HighScores::new()),
    };

    let mut driver = Driver {
        world: GameWorld::new(settings, frame, seed)?,
        accumulator: 0.0,
        input: TickInput {
            idle_mode: true,
            ..Default::default()
        },
    };

    for run in 1..=runs {
        let mut frames = 0;
        while driver.world.run_state != RunState::GameOver && frames < MAX_FRAMES_PER_RUN {
            for event in driver.update(HOST_FRAME, scores.as_mut()) {
                if let GameEvent::Died { cause, score, rank } = event {
                    log::info!("Run {run}: died ({cause:?}) at score {score}, rank {rank:?}");
                }
            }
            frames += 1;
        }
        println!(
            "run {run}: score {} (seed {}, {:.1}s)",
            driver.world.score(),
            driver.world.seed,
            frames as f32 * HOST_FRAME
        );

        driver.next_run(scores.as_mut())?;
    }

    match scores.best() {
        Ok(Some(best)) => println!("HighScore : {}", best.score),
        Ok(None) => println!("No high score yet"),
        Err(e) => log::warn!("Could not read best score: {e}"),
    }
    Ok(())
}
