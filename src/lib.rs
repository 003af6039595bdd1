//! Scroll Runner - an endless side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, terrain, run state)
//! - `highscores`: Scoreboard contract and in-memory store
//! - `persistence`: File-backed scoreboard
//! - `settings`: Data-driven game balance and frame geometry

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, StorageError};
pub use highscores::{HighScores, ScoreRecord, Scoreboard};
pub use settings::{Frame, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for stable contacts)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Collision categories (bitmask)
    pub const CATEGORY_PLAYER: u32 = 1 << 0;
    pub const CATEGORY_GROUND: u32 = 1 << 1;
    pub const CATEGORY_WALL: u32 = 1 << 2;

    /// Frame height is divided by this to get the terrain base height
    pub const BASE_HEIGHT_DIVISOR: f32 = 12.0;
    /// Terrain heights are drawn from [base, base * HEIGHT_RANGE_FACTOR)
    pub const HEIGHT_RANGE_FACTOR: u32 = 4;

    /// Overlaps at or below this are treated as resting, not penetrating
    pub const CONTACT_EPSILON: f32 = 1e-3;
    /// Contacts closer than this still count as touching (pixels)
    pub const CONTACT_SLOP: f32 = 0.5;
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
