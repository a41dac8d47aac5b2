//! Game configuration
//!
//! Every observed game variant is one `FlappyConfig` / `MazeConfig` value.
//! Configs are validated before a game is built, so an unwinnable level is
//! rejected up front instead of producing impossible pipes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::maze::grid::{CLASSIC_LAYOUT, COMPACT_LAYOUT, Maze};

/// When a new pipe pair enters the play surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Spawn once the newest pipe is `spacing` pixels in from the right edge
    Distance { spacing: f32 },
    /// Spawn every `interval` running ticks (first tick included)
    FrameCount { interval: u32 },
    /// Spawn each time accumulated tick time exceeds `interval_ms`
    Elapsed { interval_ms: f32 },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Distance { spacing: 200.0 }
    }
}

/// Points awarded for each pipe pair the bird clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringUnit {
    #[default]
    Whole,
    Half,
}

impl ScoringUnit {
    /// Award in half-point units
    pub fn halves(&self) -> u32 {
        match self {
            ScoringUnit::Whole => 2,
            ScoringUnit::Half => 1,
        }
    }
}

/// Sprite rotation hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltConfig {
    /// Radians per unit of vertical velocity
    pub gain: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            gain: 0.05,
            min: -0.5,
            max: 0.5,
        }
    }
}

/// Flappy engine parameters (pixels and pixels per tick)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyConfig {
    pub surface_width: f32,
    pub surface_height: f32,

    // === Bird ===
    pub bird_x: f32,
    pub bird_y: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    /// Added to velocity every tick
    pub gravity: f32,
    /// Velocity set by a flap (negative is up)
    pub impulse: f32,

    // === Pipes ===
    pub pipe_width: f32,
    pub pipe_speed: f32,
    pub gap_height: f32,
    /// Minimum solid height above the gap
    pub min_gap_top: f32,
    /// Minimum solid height below the gap
    pub min_gap_bottom: f32,
    pub spawn: SpawnPolicy,
    pub scoring: ScoringUnit,

    /// Wait on a start screen until the first input
    pub start_screen: bool,
    pub tilt: TiltConfig,
}

impl Default for FlappyConfig {
    fn default() -> Self {
        Self {
            surface_width: 400.0,
            surface_height: 600.0,

            bird_x: 50.0,
            bird_y: 300.0,
            bird_width: 20.0,
            bird_height: 20.0,
            gravity: 0.5,
            impulse: -8.0,

            pipe_width: 50.0,
            pipe_speed: 2.0,
            gap_height: 150.0,
            min_gap_top: 50.0,
            min_gap_bottom: 50.0,
            spawn: SpawnPolicy::default(),
            scoring: ScoringUnit::Whole,

            start_screen: false,
            tilt: TiltConfig::default(),
        }
    }
}

impl FlappyConfig {
    /// Build the config for a preset (always valid)
    pub fn from_preset(preset: FlappyPreset) -> Self {
        let base = Self::default();
        match preset {
            FlappyPreset::Classic => base,
            FlappyPreset::StartScreen => Self {
                spawn: SpawnPolicy::FrameCount { interval: 90 },
                start_screen: true,
                ..base
            },
            FlappyPreset::Visual => Self {
                bird_width: 34.0,
                bird_height: 24.0,
                spawn: SpawnPolicy::Elapsed { interval_ms: 1500.0 },
                // 2 degrees per unit of velocity, clamped to [-20, 90] degrees
                tilt: TiltConfig {
                    gain: 2.0_f32.to_radians(),
                    min: (-20.0_f32).to_radians(),
                    max: 90.0_f32.to_radians(),
                },
                ..base
            },
            FlappyPreset::Web => Self {
                bird_width: 30.0,
                bird_height: 30.0,
                spawn: SpawnPolicy::Elapsed { interval_ms: 1500.0 },
                ..base
            },
            FlappyPreset::Copilot => Self {
                bird_width: 30.0,
                bird_height: 24.0,
                spawn: SpawnPolicy::Elapsed { interval_ms: 1500.0 },
                scoring: ScoringUnit::Half,
                ..base
            },
            FlappyPreset::Gpt4o => Self {
                surface_width: 320.0,
                surface_height: 480.0,
                bird_y: 150.0,
                gravity: 0.6,
                impulse: -15.0,
                pipe_width: 20.0,
                gap_height: 100.0,
                min_gap_top: 0.0,
                // Gap top is drawn from [0, height / 2)
                min_gap_bottom: 140.0,
                spawn: SpawnPolicy::FrameCount { interval: 90 },
                ..base
            },
            FlappyPreset::Online => Self {
                bird_width: 34.0,
                bird_height: 24.0,
                gravity: 0.25,
                impulse: -6.0,
                gap_height: 100.0,
                min_gap_top: 20.0,
                min_gap_bottom: 0.0,
                spawn: SpawnPolicy::Elapsed { interval_ms: 1500.0 },
                ..base
            },
        }
    }

    /// Parse a JSON config; missing fields fall back to the defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Range the gap top is drawn from
    pub fn gap_top_range(&self) -> (f32, f32) {
        (
            self.min_gap_top,
            self.surface_height - self.gap_height - self.min_gap_bottom,
        )
    }

    /// Reject configs that cannot be played
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("surface_width", self.surface_width),
            ("surface_height", self.surface_height),
            ("bird_x", self.bird_x),
            ("bird_y", self.bird_y),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("gravity", self.gravity),
            ("impulse", self.impulse),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("gap_height", self.gap_height),
            ("min_gap_top", self.min_gap_top),
            ("min_gap_bottom", self.min_gap_bottom),
            ("tilt.gain", self.tilt.gain),
            ("tilt.min", self.tilt.min),
            ("tilt.max", self.tilt.max),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        let positive = [
            ("surface_width", self.surface_width),
            ("surface_height", self.surface_height),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("gap_height", self.gap_height),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("min_gap_top", self.min_gap_top),
            ("min_gap_bottom", self.min_gap_bottom),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let (lo, hi) = self.gap_top_range();
        if hi < lo {
            return Err(ConfigError::GapTooLarge {
                gap_height: self.gap_height,
                min_gap_top: self.min_gap_top,
                min_gap_bottom: self.min_gap_bottom,
                surface_height: self.surface_height,
            });
        }

        if self.bird_height >= self.gap_height {
            return Err(ConfigError::BirdTooLarge {
                width: self.bird_width,
                height: self.bird_height,
                gap_height: self.gap_height,
            });
        }

        let max_x = self.surface_width - self.bird_width;
        let max_y = self.surface_height - self.bird_height;
        if !(0.0..=max_x).contains(&self.bird_x) || !(0.0..=max_y).contains(&self.bird_y) {
            return Err(ConfigError::BirdOutOfBounds {
                x: self.bird_x,
                y: self.bird_y,
            });
        }

        match self.spawn {
            SpawnPolicy::Distance { spacing } => {
                if !spacing.is_finite() {
                    return Err(ConfigError::NotFinite { field: "spawn.spacing" });
                }
                if spacing <= 0.0 {
                    return Err(ConfigError::NonPositive {
                        field: "spawn.spacing",
                        value: spacing,
                    });
                }
            }
            SpawnPolicy::FrameCount { interval } => {
                if interval == 0 {
                    return Err(ConfigError::ZeroSpawnInterval);
                }
            }
            SpawnPolicy::Elapsed { interval_ms } => {
                if !interval_ms.is_finite() {
                    return Err(ConfigError::NotFinite { field: "spawn.interval_ms" });
                }
                if interval_ms <= 0.0 {
                    return Err(ConfigError::ZeroSpawnInterval);
                }
            }
        }

        Ok(())
    }
}

/// Named flappy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlappyPreset {
    /// Distance-gated spawning, whole points
    #[default]
    Classic,
    /// Start screen, spawn every 90 frames
    StartScreen,
    /// Sprite-sized bird, timed spawning, wide tilt range
    Visual,
    Web,
    /// Timed spawning, half a point per pipe
    Copilot,
    /// Small surface, heavy gravity, strong flap
    Gpt4o,
    /// Low gravity, narrow gap.
    ///
    /// Scores one whole point per cleared pair like the other whole-point
    /// presets, rather than a point for each half leaving the screen.
    Online,
}

impl FlappyPreset {
    pub const ALL: [FlappyPreset; 7] = [
        FlappyPreset::Classic,
        FlappyPreset::StartScreen,
        FlappyPreset::Visual,
        FlappyPreset::Web,
        FlappyPreset::Copilot,
        FlappyPreset::Gpt4o,
        FlappyPreset::Online,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlappyPreset::Classic => "classic",
            FlappyPreset::StartScreen => "start-screen",
            FlappyPreset::Visual => "visual",
            FlappyPreset::Web => "web",
            FlappyPreset::Copilot => "copilot",
            FlappyPreset::Gpt4o => "gpt4o",
            FlappyPreset::Online => "online",
        }
    }
}

impl fmt::Display for FlappyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlappyPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

/// A ghost's name and starting cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostSpawn {
    pub name: String,
    pub col: i32,
    pub row: i32,
}

impl GhostSpawn {
    pub fn new(name: &str, col: i32, row: i32) -> Self {
        Self {
            name: name.to_string(),
            col,
            row,
        }
    }
}

/// Maze engine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// ASCII rows: `#` wall, `.` dot, `o` pellet, space or `_` empty
    pub layout: Vec<String>,
    pub cell_size: f32,
    pub pacman_size: f32,
    pub ghost_size: f32,
    /// Pixels per tick
    pub pacman_speed: f32,
    pub ghost_speed: f32,
    /// Per-tick chance a ghost picks a fresh random direction
    pub turn_chance: f32,
    pub dot_points: u32,
    pub pellet_points: u32,
    pub lives: u8,
    /// Start cell as (col, row)
    pub pacman_start: (i32, i32),
    pub ghosts: Vec<GhostSpawn>,
    pub start_screen: bool,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self::from_preset(MazePreset::Classic)
    }
}

impl MazeConfig {
    pub fn from_preset(preset: MazePreset) -> Self {
        match preset {
            MazePreset::Classic => Self {
                layout: CLASSIC_LAYOUT.iter().map(|row| row.to_string()).collect(),
                cell_size: 16.0,
                pacman_size: 24.0,
                ghost_size: 24.0,
                pacman_speed: 2.0,
                ghost_speed: 1.5,
                turn_chance: 0.05,
                dot_points: 10,
                pellet_points: 50,
                lives: 1,
                pacman_start: (13, 22),
                ghosts: vec![
                    GhostSpawn::new("red", 14, 11),
                    GhostSpawn::new("pink", 13, 11),
                    GhostSpawn::new("cyan", 15, 11),
                    GhostSpawn::new("orange", 12, 11),
                ],
                start_screen: false,
            },
            MazePreset::Compact => Self {
                layout: COMPACT_LAYOUT.iter().map(|row| row.to_string()).collect(),
                cell_size: 40.0,
                pacman_size: 36.0,
                ghost_size: 36.0,
                pacman_speed: 5.0,
                ghost_speed: 4.0,
                // Compact ghosts only turn when blocked
                turn_chance: 0.0,
                dot_points: 10,
                pellet_points: 50,
                lives: 3,
                pacman_start: (10, 13),
                ghosts: vec![
                    GhostSpawn::new("red", 9, 8),
                    GhostSpawn::new("pink", 10, 8),
                    GhostSpawn::new("cyan", 13, 8),
                ],
                start_screen: false,
            },
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Parse the layout into a grid
    pub fn maze(&self) -> Result<Maze, ConfigError> {
        Maze::parse(&self.layout)
    }

    /// Reject configs that cannot be played; returns the parsed maze
    pub fn validate(&self) -> Result<Maze, ConfigError> {
        for (field, value) in [
            ("cell_size", self.cell_size),
            ("pacman_size", self.pacman_size),
            ("ghost_size", self.ghost_size),
            ("pacman_speed", self.pacman_speed),
            ("ghost_speed", self.ghost_speed),
            ("turn_chance", self.turn_chance),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        for (field, value) in [
            ("cell_size", self.cell_size),
            ("pacman_size", self.pacman_size),
            ("ghost_size", self.ghost_size),
            ("pacman_speed", self.pacman_speed),
            ("ghost_speed", self.ghost_speed),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.turn_chance) {
            return Err(ConfigError::TurnChance(self.turn_chance));
        }
        if self.lives == 0 {
            return Err(ConfigError::NonPositive {
                field: "lives",
                value: 0.0,
            });
        }

        let maze = self.maze()?;
        let spawns = std::iter::once(("pacman", self.pacman_start))
            .chain(self.ghosts.iter().map(|g| ("ghost", (g.col, g.row))));
        for (what, (col, row)) in spawns {
            match maze.cell(col, row) {
                None => return Err(ConfigError::SpawnOutsideMaze { what, col, row }),
                Some(cell) if cell.is_wall() => {
                    return Err(ConfigError::SpawnInWall { what, col, row });
                }
                Some(_) => {}
            }
        }

        Ok(maze)
    }
}

/// Named maze variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MazePreset {
    /// 28x30 maze with power pellets, one life
    #[default]
    Classic,
    /// 20x15 maze, large cells, three lives
    Compact,
}

impl MazePreset {
    pub const ALL: [MazePreset; 2] = [MazePreset::Classic, MazePreset::Compact];

    pub fn as_str(&self) -> &'static str {
        match self {
            MazePreset::Classic => "classic",
            MazePreset::Compact => "compact",
        }
    }
}

impl fmt::Display for MazePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MazePreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}
