//! Game world and run lifecycle
//!
//! `GameWorld` owns every entity and state enum for one run. Nothing outside
//! the per-frame `tick` mutates it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{IdAllocator, PlayerBody};
use super::collision::ContactTracker;
use super::jump::JumpState;
use super::physics;
use super::progress::Progression;
use super::terrain::{HeightSource, SeededRandom, Segment, TerrainGenerator, runway};
use crate::error::ConfigError;
use crate::highscores::{ScoreRecord, Scoreboard};
use crate::settings::{Frame, Settings};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunState {
    /// Active gameplay
    Playing,
    /// Death animation running; terrain still scrolls, scoring is frozen
    Dying { elapsed: f32, duration: f32 },
    /// Run ended, everything frozen; only a restart is accepted
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Ran into an obstacle wall
    Wall,
    /// Dropped below the bottom of the frame
    Fell,
}

/// Things that happened during a tick, for audio/HUD sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    DoubleJumped,
    Landed,
    SegmentSpawned { height: f32 },
    SpeedUp { speed: f32 },
    Died { cause: DeathCause, score: u64, rank: Option<usize> },
    ScoreSaved { rank: usize },
    GameOver { score: u64 },
    Restarted { seed: u64 },
}

/// Complete state of one run
#[derive(Debug)]
pub struct GameWorld {
    pub settings: Settings,
    pub frame: Frame,
    /// Run seed for reproducibility
    pub seed: u64,
    pub run_state: RunState,
    pub jump: JumpState,
    pub player: PlayerBody,
    /// Active segments, oldest first
    pub segments: Vec<Segment>,
    pub progress: Progression,
    pub terrain: TerrainGenerator,
    pub contacts: ContactTracker,
    /// Seconds since the world was created
    pub clock: f64,
    /// Clock value of the last generation tick (captured on the first frame)
    pub last_generation: Option<f64>,
    /// Set once the death animation completes; scrolling and physics stop
    pub frozen: bool,
    /// Running-animation clock
    pub anim_time: f32,
    /// Where the dead sprite starts its animation
    pub death_start: Vec2,
    /// Events produced since the last snapshot
    pub events: Vec<GameEvent>,
    ids: IdAllocator,
}

impl GameWorld {
    /// Start a fresh run with the seeded terrain source
    pub fn new(settings: Settings, frame: Frame, seed: u64) -> Result<Self, ConfigError> {
        Self::with_random(settings, frame, seed, Box::new(SeededRandom::new(seed)))
    }

    /// Start a fresh run with an injected terrain source
    pub fn with_random(
        settings: Settings,
        frame: Frame,
        seed: u64,
        source: Box<dyn HeightSource>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        // Revalidate: a Frame may have been built by hand
        let frame = Frame::new(frame.width, frame.height)?;
        Ok(Self::build(settings, frame, seed, source))
    }

    fn build(settings: Settings, frame: Frame, seed: u64, source: Box<dyn HeightSource>) -> Self {
        let mut ids = IdAllocator::default();
        let segments = runway(&frame, &settings, &mut ids);
        let start = Vec2::new(
            frame.width * settings.player_start.x,
            frame.height * settings.player_start.y,
        );
        let player = PlayerBody::new(start, settings.player_size, start.x);
        let progress = Progression::new(
            settings.initial_speed,
            settings.speed_step,
            settings.ticks_per_speed_up,
        );
        log::info!(
            "Run started: seed {}, frame {}x{}, {} runway tiles",
            seed,
            frame.width,
            frame.height,
            segments.len()
        );
        Self {
            settings,
            frame,
            seed,
            run_state: RunState::Playing,
            jump: JumpState::Ground,
            player,
            segments,
            progress,
            terrain: TerrainGenerator::new(source),
            contacts: ContactTracker::default(),
            clock: 0.0,
            last_generation: None,
            frozen: false,
            anim_time: 0.0,
            death_start: start,
            events: Vec::new(),
            ids,
        }
    }

    /// Host frame changed size
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.frame = Frame::new(width, height)?;
        self.player.recenter_x = width * self.settings.player_start.x;
        log::info!("Frame resized to {}x{}", width, height);
        Ok(())
    }

    pub fn score(&self) -> u64 {
        self.progress.score()
    }

    /// World speed multiplier (never decreases within a run)
    pub fn world_speed(&self) -> f32 {
        self.progress.world_speed()
    }

    /// Leftward scroll velocity of the terrain (zero once frozen)
    pub fn scroll_velocity(&self) -> f32 {
        if self.frozen {
            0.0
        } else {
            self.settings.scroll_velocity(self.world_speed())
        }
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Playing
    }

    /// Spawn the next terrain segment
    pub fn spawn_segment(&mut self) {
        let segment = self
            .terrain
            .generate(&self.frame, &self.settings, &mut self.ids);
        self.events.push(GameEvent::SegmentSpawned {
            height: segment.height,
        });
        self.segments.push(segment);
    }

    /// Enter the death animation. Only the first call per run has any effect.
    pub fn begin_dying(&mut self, cause: DeathCause, scores: &mut dyn Scoreboard, timestamp: u64) {
        if !self.is_playing() {
            return;
        }
        self.run_state = RunState::Dying {
            elapsed: 0.0,
            duration: self.settings.death_duration,
        };
        self.death_start = self.player.pos;
        self.player.kill();
        self.player.rotation = 0.0;
        self.player.scale = 1.0;
        self.contacts.clear();

        let score = self.score();
        log::info!("Player died ({:?}) with score {}", cause, score);
        let rank = self.record_score(scores, timestamp);
        self.events.push(GameEvent::Died { cause, score, rank });
    }

    /// Rank the final score and persist it if it made the cut. Storage
    /// failures are logged and swallowed.
    fn record_score(&mut self, scores: &mut dyn Scoreboard, timestamp: u64) -> Option<usize> {
        let score = self.score();
        let rank = match scores.rank(score) {
            Ok(rank) => rank,
            Err(e) => {
                log::warn!("Scoreboard rank failed: {e}");
                return None;
            }
        };
        if rank > self.settings.rank_cutoff {
            return Some(rank);
        }

        let record = ScoreRecord { score, timestamp };
        for attempt in 1..=self.settings.persist_attempts.max(1) {
            match scores.insert(record) {
                Ok(()) => {
                    self.events.push(GameEvent::ScoreSaved { rank });
                    return Some(rank);
                }
                Err(e) => log::warn!("Scoreboard insert attempt {attempt} failed: {e}"),
            }
        }
        Some(rank)
    }

    /// Death animation finished: freeze everything
    pub fn finish_dying(&mut self) {
        if !matches!(self.run_state, RunState::Dying { .. }) {
            return;
        }
        self.run_state = RunState::GameOver;
        self.frozen = true;
        physics::freeze(&mut self.player);
        log::info!("Game over with score {}", self.score());
        self.events.push(GameEvent::GameOver {
            score: self.score(),
        });
    }

    /// Replace this world with a brand-new run
    pub fn restart(&mut self) {
        if !(self.run_state == RunState::GameOver && self.frozen) {
            return;
        }
        let seed = self.seed.wrapping_add(1);
        let settings = self.settings.clone();
        *self = Self::build(settings, self.frame, seed, Box::new(SeededRandom::new(seed)));
        log::info!("Game restarted with seed: {}", seed);
        self.events.push(GameEvent::Restarted { seed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::highscores::HighScores;

    fn world() -> GameWorld {
        GameWorld::new(Settings::default(), Frame::new(400.0, 600.0).unwrap(), 42).unwrap()
    }

    /// Store that is always unreachable
    struct Offline {
        insert_calls: u32,
    }

    impl Scoreboard for Offline {
        fn rank(&self, _score: u64) -> Result<usize, StorageError> {
            Ok(1)
        }

        fn insert(&mut self, _record: ScoreRecord) -> Result<(), StorageError> {
            self.insert_calls += 1;
            Err(StorageError::Unavailable("offline".into()))
        }

        fn best(&self) -> Result<Option<ScoreRecord>, StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_new_world() {
        let w = world();
        assert!(w.is_playing());
        assert_eq!(w.score(), 0);
        assert_eq!(w.jump, JumpState::Ground);
        assert_eq!(w.player.pos, Vec2::new(100.0, 480.0));
        assert_eq!(w.segments.len(), 9);
        assert!((w.world_speed() - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_frame_is_fatal() {
        let frame = Frame {
            width: 0.0,
            height: 600.0,
        };
        assert!(matches!(
            GameWorld::new(Settings::default(), frame, 1),
            Err(ConfigError::DegenerateFrame { .. })
        ));
    }

    #[test]
    fn test_begin_dying_once() {
        let mut w = world();
        let mut scores = HighScores::new();
        w.begin_dying(DeathCause::Wall, &mut scores, 10);
        w.begin_dying(DeathCause::Wall, &mut scores, 20);
        assert_eq!(scores.records.len(), 1);
        assert_eq!(scores.records[0].timestamp, 10);
        assert!(matches!(w.run_state, RunState::Dying { .. }));
        assert!(!w.player.physics_enabled);
    }

    #[test]
    fn test_low_rank_not_persisted() {
        let mut w = world();
        let mut scores = HighScores::new();
        for i in 0..10 {
            scores
                .insert(ScoreRecord {
                    score: 100 + i,
                    timestamp: i,
                })
                .unwrap();
        }
        w.begin_dying(DeathCause::Wall, &mut scores, 99);
        assert_eq!(scores.records.len(), 10);
        assert!(w.events.contains(&GameEvent::Died {
            cause: DeathCause::Wall,
            score: 0,
            rank: Some(11),
        }));
    }

    #[test]
    fn test_storage_failure_does_not_block_game_over() {
        let mut w = world();
        let mut offline = Offline { insert_calls: 0 };
        w.begin_dying(DeathCause::Fell, &mut offline, 0);
        assert_eq!(offline.insert_calls, 2);
        assert!(matches!(w.run_state, RunState::Dying { .. }));
        w.finish_dying();
        assert_eq!(w.run_state, RunState::GameOver);
    }

    #[test]
    fn test_restart_requires_frozen_game_over() {
        let mut w = world();
        w.restart();
        assert_eq!(w.seed, 42);

        let mut scores = HighScores::new();
        w.begin_dying(DeathCause::Wall, &mut scores, 0);
        w.restart();
        assert_eq!(w.seed, 42);

        w.finish_dying();
        assert!(w.frozen);
        assert_eq!(w.scroll_velocity(), 0.0);
        w.restart();
        assert_eq!(w.seed, 43);
        assert!(w.is_playing());
        assert!(!w.frozen);
    }

    #[test]
    fn test_resize_moves_recenter_target() {
        let mut w = world();
        w.resize(800.0, 600.0).unwrap();
        assert_eq!(w.player.recenter_x, 200.0);
        assert!(w.resize(-1.0, 600.0).is_err());
        assert_eq!(w.frame.width, 800.0);
    }

    #[test]
    fn test_restart_lays_runway_for_resized_frame() {
        let mut w = world();
        assert_eq!(w.segments.len(), 9);
        w.resize(800.0, 600.0).unwrap();

        let mut scores = HighScores::new();
        w.begin_dying(DeathCause::Wall, &mut scores, 0);
        w.finish_dying();
        w.restart();

        assert!(w.is_playing());
        assert_eq!(w.segments.len(), 16);
        assert_eq!(w.player.pos.x, 200.0);
        assert_eq!(w.player.recenter_x, 200.0);
    }
}
