//! Maze game state

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Maze;
use crate::error::ConfigError;
use crate::input::Direction;
use crate::settings::{GhostSpawn, MazeConfig};
use crate::sim::GamePhase;

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pacman {
    /// Top-left corner in pixels
    pub pos: Vec2,
    /// Facing, for the renderer's mouth direction
    pub facing: Direction,
    pub size: f32,
}

impl Pacman {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    /// Colour name for the renderer
    pub name: String,
    pub pos: Vec2,
    pub direction: Direction,
    pub size: f32,
    /// Where a lost life sends this ghost back to
    pub home: Vec2,
}

impl Ghost {
    pub fn from_spawn(spawn: &GhostSpawn, config: &MazeConfig) -> Self {
        let home = cell_origin(spawn.col, spawn.row, config.cell_size);
        Self {
            name: spawn.name.clone(),
            pos: home,
            direction: Direction::Up,
            size: config.ghost_size,
            home,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Things that happened during a maze tick
#[derive(Debug, Clone, PartialEq)]
pub enum MazeEvent {
    Started,
    DotEaten { col: i32, row: i32, score: u32 },
    /// Ghost vulnerability is not implemented; ghosts stay dangerous
    PowerPelletEaten { col: i32, row: i32, score: u32 },
    LifeLost { ghost: String, lives: u8 },
    GameOver { score: u32 },
    Reset,
}

fn cell_origin(col: i32, row: i32, cell_size: f32) -> Vec2 {
    Vec2::new(col as f32 * cell_size, row as f32 * cell_size)
}

/// Complete maze game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeState {
    pub config: MazeConfig,
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub maze: Maze,
    /// The maze as first parsed, restored on reset
    start_maze: Maze,
    pub pacman: Pacman,
    pub ghosts: Vec<Ghost>,
    pub score: u32,
    pub lives: u8,
    pub time_ticks: u64,
}

impl MazeState {
    pub fn new(config: MazeConfig, seed: u64) -> Result<Self, ConfigError> {
        let maze = config.validate()?;
        Ok(Self::initial(config, maze, seed))
    }

    fn initial(config: MazeConfig, maze: Maze, seed: u64) -> Self {
        let (col, row) = config.pacman_start;
        let pacman = Pacman {
            pos: cell_origin(col, row, config.cell_size),
            facing: Direction::Right,
            size: config.pacman_size,
        };
        let ghosts = config
            .ghosts
            .iter()
            .map(|spawn| Ghost::from_spawn(spawn, &config))
            .collect();
        let phase = if config.start_screen {
            GamePhase::NotStarted
        } else {
            GamePhase::Running
        };
        Self {
            lives: config.lives,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase,
            start_maze: maze.clone(),
            maze,
            pacman,
            ghosts,
            score: 0,
            time_ticks: 0,
        }
    }

    /// The state a reset returns to
    pub fn restarted(&self) -> Self {
        Self::initial(self.config.clone(), self.start_maze.clone(), self.seed)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Send Pacman and the ghosts back to their start cells
    pub fn respawn_actors(&mut self) {
        let (col, row) = self.config.pacman_start;
        self.pacman.pos = cell_origin(col, row, self.config.cell_size);
        self.pacman.facing = Direction::Right;
        for ghost in &mut self.ghosts {
            ghost.pos = ghost.home;
            ghost.direction = Direction::Up;
        }
    }
}
