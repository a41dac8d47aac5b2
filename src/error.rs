//! Configuration errors
//!
//! Gameplay itself has no error paths; everything that can go wrong is caught
//! when a config is built or loaded.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error(
        "gap of {gap_height} plus margins {min_gap_top}/{min_gap_bottom} does not fit a surface {surface_height} high"
    )]
    GapTooLarge {
        gap_height: f32,
        min_gap_top: f32,
        min_gap_bottom: f32,
        surface_height: f32,
    },

    #[error("bird ({width}x{height}) does not fit through a gap of {gap_height}")]
    BirdTooLarge {
        width: f32,
        height: f32,
        gap_height: f32,
    },

    #[error("bird start position ({x}, {y}) is outside the play surface")]
    BirdOutOfBounds { x: f32, y: f32 },

    #[error("spawn interval must be non-zero")]
    ZeroSpawnInterval,

    #[error("turn chance must be within [0, 1] (got {0})")]
    TurnChance(f32),

    #[error("invalid maze layout: {0}")]
    Layout(String),

    #[error("{what} spawn cell ({col}, {row}) is outside the maze")]
    SpawnOutsideMaze {
        what: &'static str,
        col: i32,
        row: i32,
    },

    #[error("{what} spawn cell ({col}, {row}) is a wall")]
    SpawnInWall {
        what: &'static str,
        col: i32,
        row: i32,
    },

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}
