//! Arcade Sim - deterministic simulation core for small arcade games
//!
//! Core modules:
//! - `sim`: Flappy engine (gravity, pipes, collisions, score)
//! - `maze`: Maze engine (grid movement, ghosts, dots and pellets)
//! - `settings`: Validated, data-driven game configuration
//! - `input`: Raw key codes to semantic input events
//! - `driver`: Fixed timestep loop shared by both engines

pub mod driver;
pub mod error;
pub mod input;
pub mod maze;
pub mod settings;
pub mod sim;

pub use driver::{FixedStepDriver, Simulation};
pub use error::ConfigError;
pub use input::{Direction, InputEvent};
pub use settings::{FlappyConfig, FlappyPreset, MazeConfig, MazePreset, ScoringUnit, SpawnPolicy};

/// Game configuration constants
pub mod consts {
    /// Nominal tick length in milliseconds (one 60 Hz display refresh)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on
    pub const MAX_FRAME_MS: f32 = 100.0;
}

/// Sprite rotation for a given vertical velocity, clamped to `[min, max]` radians
#[inline]
pub fn tilt_radians(velocity: f32, gain: f32, min: f32, max: f32) -> f32 {
    (velocity * gain).clamp(min, max)
}
