//! Deterministic flappy simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Per-tick physics only
//! - Seeded RNG only
//! - Stable iteration order (pipes oldest first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionKind, check_bird, circles_overlap, hits_pipe};
pub use spawn::SpawnGate;
pub use state::{Bird, GameEvent, GamePhase, GameState, Pipe, Score};
pub use tick::{TickInput, autopilot_flap, step, tick};
