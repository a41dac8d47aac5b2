//! Deterministic maze simulation
//!
//! Same rules as the flappy engine: seeded RNG, per-tick movement, ghosts
//! updated in spawn order, nothing that touches a screen.

pub mod grid;
pub mod state;
pub mod tick;

pub use grid::{CLASSIC_LAYOUT, COMPACT_LAYOUT, Cell, Maze};
pub use state::{Ghost, MazeEvent, MazeState, Pacman};
pub use tick::{MazeInput, step, tick};
