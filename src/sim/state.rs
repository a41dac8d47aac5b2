//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`, including the RNG,
//! so two states compare equal only if they will also evolve identically.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::CollisionKind;
use super::spawn::SpawnGate;
use crate::error::ConfigError;
use crate::settings::{FlappyConfig, ScoringUnit};
use crate::tilt_radians;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, waiting for the first input
    NotStarted,
    Running,
    /// Frozen until an explicit reset
    Over,
}

/// Score in half-point units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(pub u32);

impl Score {
    pub fn add(&mut self, unit: ScoringUnit) {
        self.0 += unit.halves();
    }

    pub fn points(&self) -> f32 {
        self.0 as f32 / 2.0
    }

    /// Whole points, as the score display shows them
    pub fn display(&self) -> u32 {
        self.0 / 2
    }
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity (pixels per tick, positive is down)
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
}

impl Bird {
    pub fn from_config(config: &FlappyConfig) -> Self {
        Self {
            pos: Vec2::new(config.bird_x, config.bird_y),
            velocity: 0.0,
            width: config.bird_width,
            height: config.bird_height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }
}

/// A pipe pair: solid above `gap_top`, solid below `gap_bottom()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    /// Already counted toward the score
    pub scored: bool,
}

impl Pipe {
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Right edge (pipes travel left)
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Things that happened during a tick, for hosts that log or play sounds
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Flapped,
    PipeSpawned { id: u32, gap_top: f32 },
    Scored { id: u32, score: Score },
    Collided { kind: CollisionKind, score: Score },
    Reset,
}

/// Complete flappy game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub config: FlappyConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub bird: Bird,
    /// Live pipes, oldest first
    pub pipes: Vec<Pipe>,
    pub score: Score,
    pub spawn_gate: SpawnGate,
    /// Running ticks since start
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Validate `config` and build the initial state
    pub fn new(config: FlappyConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::initial(config, seed))
    }

    /// Initial state for an already validated config
    pub(crate) fn initial(config: FlappyConfig, seed: u64) -> Self {
        let phase = if config.start_screen {
            GamePhase::NotStarted
        } else {
            GamePhase::Running
        };
        Self {
            bird: Bird::from_config(&config),
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase,
            pipes: Vec::new(),
            score: Score::default(),
            spawn_gate: SpawnGate::default(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// The state a reset returns to
    pub fn restarted(&self) -> Self {
        Self::initial(self.config.clone(), self.seed)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Over
    }

    /// Allocate a new pipe ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a pipe at the right edge with a random gap; returns it
    pub fn spawn_pipe(&mut self) -> &Pipe {
        use rand::Rng;

        let (lo, hi) = self.config.gap_top_range();
        let gap_top = self.rng.random_range(lo..=hi);
        let id = self.next_entity_id();
        self.pipes.push(Pipe {
            id,
            x: self.config.surface_width,
            width: self.config.pipe_width,
            gap_top,
            gap_height: self.config.gap_height,
            scored: false,
        });
        &self.pipes[self.pipes.len() - 1]
    }

    /// Sprite rotation for renderers, from the bird's velocity
    pub fn bird_tilt(&self) -> f32 {
        let tilt = &self.config.tilt;
        tilt_radians(self.bird.velocity, tilt.gain, tilt.min, tilt.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_matches_config() {
        let state = GameState::new(FlappyConfig::default(), 7).unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.bird.pos, Vec2::new(50.0, 300.0));
        assert_eq!(state.bird.velocity, 0.0);
        assert!(state.pipes.is_empty());
        assert_eq!(state.score, Score(0));

        let config = FlappyConfig {
            start_screen: true,
            ..Default::default()
        };
        let state = GameState::new(config, 7).unwrap();
        assert_eq!(state.phase, GamePhase::NotStarted);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = FlappyConfig {
            gap_height: 1000.0,
            ..Default::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_spawned_gap_within_margins() {
        let mut state = GameState::new(FlappyConfig::default(), 99).unwrap();
        for _ in 0..500 {
            let pipe = state.spawn_pipe().clone();
            assert!(pipe.gap_top >= 50.0);
            assert!(pipe.gap_bottom() <= 550.0);
            assert_eq!(pipe.x, 400.0);
        }
        let ids: Vec<u32> = state.pipes.iter().map(|p| p.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_pipes() {
        let mut a = GameState::new(FlappyConfig::default(), 42).unwrap();
        let mut b = GameState::new(FlappyConfig::default(), 42).unwrap();
        for _ in 0..10 {
            assert_eq!(a.spawn_pipe().gap_top, b.spawn_pipe().gap_top);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_units() {
        let mut score = Score::default();
        score.add(ScoringUnit::Half);
        assert_eq!(score.points(), 0.5);
        assert_eq!(score.display(), 0);
        score.add(ScoringUnit::Half);
        score.add(ScoringUnit::Whole);
        assert_eq!(score.points(), 2.0);
        assert_eq!(score.display(), 2);
    }

    #[test]
    fn test_bird_tilt_follows_velocity() {
        let mut state = GameState::new(FlappyConfig::default(), 1).unwrap();
        state.bird.velocity = -8.0;
        assert_eq!(state.bird_tilt(), -0.4);
        state.bird.velocity = 30.0;
        assert_eq!(state.bird_tilt(), 0.5);
    }

    #[test]
    fn test_state_serializes() {
        let mut state = GameState::new(FlappyConfig::default(), 3).unwrap();
        state.spawn_pipe();
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
