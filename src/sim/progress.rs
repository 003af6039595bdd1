//! Score and world speed progression

use serde::{Deserialize, Serialize};

/// Score and difficulty for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    score: u64,
    /// Generation ticks since the last speed-up
    speed_up_count: u32,
    /// Number of speed-ups so far
    speed_level: u32,
    initial_speed: f32,
    speed_step: f32,
    ticks_per_speed_up: u32,
}

impl Progression {
    pub fn new(initial_speed: f32, speed_step: f32, ticks_per_speed_up: u32) -> Self {
        Self {
            score: 0,
            speed_up_count: 0,
            speed_level: 0,
            initial_speed,
            speed_step,
            ticks_per_speed_up: ticks_per_speed_up.max(1),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Current world speed multiplier
    pub fn world_speed(&self) -> f32 {
        self.initial_speed + self.speed_step * self.speed_level as f32
    }

    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }

    /// One point per qualifying generation tick
    pub fn score_up(&mut self) {
        self.score += 1;
    }

    /// Count a generation tick; every `ticks_per_speed_up`th raises world
    /// speed. Returns true when the speed went up.
    ///
    /// The counter resets on the tick that fires, so with the default of 6
    /// every 6th tick speeds up rather than every 7th.
    pub fn speed_up(&mut self) -> bool {
        self.speed_up_count += 1;
        if self.speed_up_count >= self.ticks_per_speed_up {
            self.speed_up_count = 0;
            self.speed_level += 1;
            log::debug!("Speed up: level {} ({:.1})", self.speed_level, self.world_speed());
            true
        } else {
            false
        }
    }

    /// HUD text for the score
    pub fn label(&self) -> String {
        format!("score : {}", self.score)
    }
}
