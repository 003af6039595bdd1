//! Error types
//!
//! Configuration errors are fatal at scene start. Storage errors are
//! suppressed by the controller so a run always ends cleanly.

use thiserror::Error;

/// Hosting or tuning misconfiguration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("degenerate frame geometry {width}x{height}")]
    DegenerateFrame { width: f32, height: f32 },
    #[error("frame height {height} yields a zero terrain base height")]
    ZeroBaseHeight { height: f32 },
    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scoreboard store failure
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("scoreboard i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scoreboard data is corrupt: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scoreboard unavailable: {0}")]
    Unavailable(String),
}
