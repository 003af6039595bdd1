//! Game tuning and frame geometry
//!
//! Every gameplay constant lives in `Settings` so balance can be tweaked from
//! a JSON file without recompiling.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BASE_HEIGHT_DIVISOR;
use crate::error::ConfigError;

/// Visible frame supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Frame {
    /// Validate host geometry. Degenerate frames are fatal at scene start.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::DegenerateFrame { width, height });
        }
        let frame = Self { width, height };
        if frame.base_height() == 0 {
            return Err(ConfigError::ZeroBaseHeight { height });
        }
        Ok(frame)
    }

    /// Terrain base height: whole pixels of one twelfth of the frame height
    pub fn base_height(&self) -> u32 {
        (self.height / BASE_HEIGHT_DIVISOR).floor() as u32
    }

    /// Frame centre
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// First jump velocity (px/s)
    pub jump_impulse: f32,
    /// Second jump velocity (px/s), must be below `jump_impulse`
    pub double_jump_impulse: f32,

    // === World speed ===
    /// Scroll velocity at world speed 1.0 (px/s)
    pub base_scroll: f32,
    /// World speed at run start
    pub initial_speed: f32,
    /// World speed gained per speed-up
    pub speed_step: f32,
    /// Generation ticks between speed-ups
    pub ticks_per_speed_up: u32,
    /// Generation interval at world speed 1.0 (seconds)
    pub base_interval: f32,

    // === Geometry ===
    /// Ground surface tile (width, height)
    pub ground_tile: Vec2,
    /// Height of one undercroft fill tile
    pub fill_tile_height: f32,
    /// Player collision box (width, height)
    pub player_size: Vec2,
    /// Player start position as a fraction of the frame
    pub player_start: Vec2,
    /// Horizontal band (fractions of width) the player is kept inside
    pub recenter_band: (f32, f32),
    /// Vertical lift applied on each re-centering nudge (px)
    pub recenter_lift: f32,
    /// Segments spawn this many tile widths past the right edge
    pub spawn_margin_tiles: f32,
    /// Segments travel the frame width plus this many tile widths
    pub travel_margin_tiles: f32,
    /// Runway tiles laid beyond the frame width at start
    pub runway_margin_tiles: f32,

    // === Presentation ===
    /// Death animation length (seconds)
    pub death_duration: f32,
    /// Final scale of the dead sprite
    pub death_scale: f32,
    /// Seconds per running-animation frame
    pub run_frame_time: f32,
    /// Number of running-animation frames
    pub run_frame_count: u32,

    // === Scoreboard ===
    /// Scores ranked at or above this are persisted
    pub rank_cutoff: usize,
    /// Insert attempts before a persistence failure is dropped
    pub persist_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: 450.0,
            jump_impulse: 420.0,
            double_jump_impulse: 260.0,

            base_scroll: 100.0,
            initial_speed: 1.7,
            speed_step: 0.1,
            ticks_per_speed_up: 6,
            base_interval: 0.6,

            ground_tile: Vec2::new(60.0, 24.0),
            fill_tile_height: 24.0,
            player_size: Vec2::new(32.0, 32.0),
            player_start: Vec2::new(0.25, 0.8),
            recenter_band: (0.23, 0.27),
            recenter_lift: 1.0,
            spawn_margin_tiles: 2.0,
            travel_margin_tiles: 3.0,
            runway_margin_tiles: 3.0,

            death_duration: 2.0,
            death_scale: 5.0,
            run_frame_time: 0.2,
            run_frame_count: 4,

            rank_cutoff: 10,
            persist_attempts: 2,
        }
    }
}

impl Settings {
    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("double_jump_impulse", self.double_jump_impulse),
            ("base_scroll", self.base_scroll),
            ("initial_speed", self.initial_speed),
            ("base_interval", self.base_interval),
            ("ground_tile.x", self.ground_tile.x),
            ("ground_tile.y", self.ground_tile.y),
            ("fill_tile_height", self.fill_tile_height),
            ("player_size.x", self.player_size.x),
            ("player_size.y", self.player_size.y),
            ("death_duration", self.death_duration),
            ("run_frame_time", self.run_frame_time),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if self.double_jump_impulse >= self.jump_impulse {
            return Err(ConfigError::InvalidSetting {
                name: "double_jump_impulse",
                reason: "must be below jump_impulse".to_string(),
            });
        }
        if self.speed_step < 0.0 {
            return Err(ConfigError::InvalidSetting {
                name: "speed_step",
                reason: "world speed never decreases".to_string(),
            });
        }
        if self.ticks_per_speed_up == 0 || self.run_frame_count == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "ticks_per_speed_up",
                reason: "counts must be non-zero".to_string(),
            });
        }
        let (lo, hi) = self.recenter_band;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(ConfigError::InvalidSetting {
                name: "recenter_band",
                reason: format!("bad band {lo}..{hi}"),
            });
        }
        Ok(())
    }

    /// Load settings from a JSON file; missing fields take defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Scroll velocity for a given world speed (px/s, leftward)
    pub fn scroll_velocity(&self, world_speed: f32) -> f32 {
        self.base_scroll * world_speed
    }

    /// Seconds between generation ticks at a given world speed
    pub fn generation_interval(&self, world_speed: f32) -> f32 {
        self.base_interval / world_speed
    }
}
