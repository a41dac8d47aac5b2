//! Maze simulation tick
//!
//! Movement is continuous in pixels but collision is per cell: a move is
//! rejected when the destination's top-left point lands in a wall cell.

use rand::Rng;
use rand_pcg::Pcg32;

use super::grid::{Cell, Maze};
use super::state::{MazeEvent, MazeState};
use crate::input::{Direction, HeldDirections, InputEvent, InputLatch};
use crate::sim::{GamePhase, circles_overlap};

/// Input latched since the previous tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MazeInput {
    pub held: HeldDirections,
    /// Leave the start screen
    pub start: bool,
    /// Restart, honoured only once the game is over
    pub reset: bool,
}

impl InputLatch for MazeInput {
    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(direction) => self.held.set(direction, true),
            InputEvent::Release(direction) => self.held.set(direction, false),
            InputEvent::Flap => self.start = true,
            InputEvent::Reset => self.reset = true,
            InputEvent::Action => {
                self.start = true;
                self.reset = true;
            }
        }
    }

    fn clear_one_shots(&mut self) {
        self.start = false;
        self.reset = false;
    }
}

/// Held keys are applied in this order; the last one held sets the facing
const KEY_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Advance the maze by one tick in place, returning what happened
pub fn tick(state: &mut MazeState, input: &MazeInput, _dt_ms: f32) -> Vec<MazeEvent> {
    let mut events = Vec::new();

    match state.phase {
        GamePhase::Over => {
            if input.reset {
                *state = state.restarted();
                log::info!("Maze reset (seed {})", state.seed);
                events.push(MazeEvent::Reset);
            }
            return events;
        }
        GamePhase::NotStarted => {
            if input.start || input.held.any() {
                state.phase = GamePhase::Running;
                log::info!("Maze started");
                events.push(MazeEvent::Started);
            }
            return events;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    move_pacman(state, &input.held);
    move_ghosts(state);
    eat(state, &mut events);
    check_ghosts(state, &mut events);

    events
}

/// Pure form of [`tick`]
pub fn step(state: &MazeState, input: &MazeInput, dt_ms: f32) -> MazeState {
    let mut next = state.clone();
    tick(&mut next, input, dt_ms);
    next
}

/// Wrap an actor leaving through a side tunnel to the opposite side
fn wrap_x(x: f32, size: f32, width: f32) -> f32 {
    if x < -size {
        width
    } else if x > width {
        -size
    } else {
        x
    }
}

fn random_direction(rng: &mut Pcg32) -> Direction {
    Direction::ALL[rng.random_range(0..Direction::ALL.len())]
}

fn move_pacman(state: &mut MazeState, held: &HeldDirections) {
    let cell_size = state.config.cell_size;
    let speed = state.config.pacman_speed;
    let pacman = &mut state.pacman;

    let mut next = pacman.pos;
    for direction in KEY_ORDER {
        if held.is_held(direction) {
            next += direction.delta() * speed;
            pacman.facing = direction;
        }
    }

    if next != pacman.pos && state.maze.is_passable(next, cell_size) {
        pacman.pos = next;
    }
    pacman.pos.x = wrap_x(pacman.pos.x, pacman.size, state.maze.width_px(cell_size));
}

fn move_ghosts(state: &mut MazeState) {
    let MazeState {
        config,
        rng,
        maze,
        ghosts,
        ..
    } = state;
    let width = maze.width_px(config.cell_size);

    for ghost in ghosts.iter_mut() {
        if rng.random::<f32>() < config.turn_chance {
            ghost.direction = random_direction(rng);
        }

        let next = ghost.pos + ghost.direction.delta() * config.ghost_speed;
        if maze.is_passable(next, config.cell_size) {
            ghost.pos = next;
        } else {
            ghost.direction = random_direction(rng);
        }
        ghost.pos.x = wrap_x(ghost.pos.x, ghost.size, width);
    }
}

fn eat(state: &mut MazeState, events: &mut Vec<MazeEvent>) {
    let (col, row) = Maze::cell_coord(state.pacman.center(), state.config.cell_size);
    match state.maze.cell(col, row) {
        Some(Cell::Dot) => {
            state.maze.set(col, row, Cell::Empty);
            state.score += state.config.dot_points;
            events.push(MazeEvent::DotEaten {
                col,
                row,
                score: state.score,
            });
        }
        Some(Cell::Pellet) => {
            state.maze.set(col, row, Cell::Empty);
            state.score += state.config.pellet_points;
            log::debug!("Power pellet at ({col}, {row}), score {}", state.score);
            events.push(MazeEvent::PowerPelletEaten {
                col,
                row,
                score: state.score,
            });
        }
        _ => {}
    }
}

fn check_ghosts(state: &mut MazeState, events: &mut Vec<MazeEvent>) {
    let pacman_center = state.pacman.center();
    let pacman_radius = state.pacman.size / 2.0;
    let Some(ghost) = state
        .ghosts
        .iter()
        .find(|g| circles_overlap(pacman_center, pacman_radius, g.center(), g.size / 2.0))
    else {
        return;
    };
    let ghost = ghost.name.clone();

    state.lives = state.lives.saturating_sub(1);
    events.push(MazeEvent::LifeLost {
        ghost: ghost.clone(),
        lives: state.lives,
    });

    if state.lives > 0 {
        log::info!("Caught by {ghost}, {} lives left", state.lives);
        state.respawn_actors();
    } else {
        state.phase = GamePhase::Over;
        log::info!(
            "Game over after {} ticks: caught by {ghost}, score {}",
            state.time_ticks,
            state.score
        );
        events.push(MazeEvent::GameOver { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MazeConfig, MazePreset};
    use glam::Vec2;

    const DT: f32 = crate::consts::FRAME_MS;

    fn holding(direction: Direction) -> MazeInput {
        let mut input = MazeInput::default();
        input.apply(InputEvent::Press(direction));
        input
    }

    /// Classic maze with no ghosts in the way
    fn empty_classic() -> MazeState {
        let mut state = MazeState::new(MazeConfig::default(), 9).unwrap();
        state.ghosts.clear();
        state
    }

    #[test]
    fn test_wall_blocks_movement() {
        let mut state = empty_classic();
        let start = state.pacman.pos;
        // Cell above the start is a wall
        tick(&mut state, &holding(Direction::Up), DT);
        assert_eq!(state.pacman.pos, start);
        assert_eq!(state.pacman.facing, Direction::Up);
    }

    #[test]
    fn test_walk_and_eat_dot() {
        let mut state = empty_classic();
        let input = holding(Direction::Left);
        for _ in 0..6 {
            let events = tick(&mut state, &input, DT);
            assert!(events.is_empty());
        }
        let events = tick(&mut state, &input, DT);
        assert_eq!(
            events,
            vec![MazeEvent::DotEaten {
                col: 12,
                row: 22,
                score: 10
            }]
        );
        assert_eq!(state.maze.cell(12, 22), Some(Cell::Empty));
        assert_eq!(state.pacman.pos.x, 208.0 - 14.0);
    }

    #[test]
    fn test_power_pellet_scores_and_keeps_ghosts_dangerous() {
        let mut state = empty_classic();
        state.pacman.pos = Vec2::new(18.0, 352.0);
        let food = state.maze.remaining_food();

        let events = tick(&mut state, &MazeInput::default(), DT);
        assert_eq!(
            events,
            vec![MazeEvent::PowerPelletEaten {
                col: 1,
                row: 22,
                score: 50
            }]
        );
        assert_eq!(state.maze.cell(1, 22), Some(Cell::Empty));
        assert_eq!(state.maze.remaining_food(), food - 1);

        // A ghost right on top still ends the game
        let mut ghost_state = MazeState::new(MazeConfig::default(), 9).unwrap();
        ghost_state.ghosts.truncate(1);
        ghost_state.ghosts[0].pos = state.pacman.pos;
        state.ghosts = ghost_state.ghosts;
        tick(&mut state, &MazeInput::default(), DT);
        assert!(state.is_over());
    }

    #[test]
    fn test_ghost_contact_ends_single_life_game() {
        let mut state = MazeState::new(MazeConfig::default(), 3).unwrap();
        state.ghosts.truncate(1);
        state.ghosts[0].pos = state.pacman.pos;

        let events = tick(&mut state, &MazeInput::default(), DT);
        assert!(state.is_over());
        assert_eq!(state.lives, 0);
        assert!(events.contains(&MazeEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_ghost_contact_costs_a_life_and_respawns() {
        let mut state = MazeState::new(MazeConfig::from_preset(MazePreset::Compact), 3).unwrap();
        let fresh = state.clone();
        state.score = 120;
        state.pacman.pos = Vec2::new(40.0, 40.0);
        state.ghosts[1].pos = Vec2::new(40.0, 40.0);

        let events = tick(&mut state, &MazeInput::default(), DT);
        assert!(matches!(
            &events[..],
            [.., MazeEvent::LifeLost { lives: 2, .. }]
        ));
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, 2);
        assert_eq!(state.pacman, fresh.pacman);
        assert_eq!(state.ghosts, fresh.ghosts);
        // Score includes the dot under (1, 1)
        assert_eq!(state.score, 130);
    }

    #[test]
    fn test_distant_ghost_is_harmless() {
        let mut state = empty_classic();
        let mut ghosts = MazeState::new(MazeConfig::default(), 9).unwrap().ghosts;
        ghosts.truncate(1);
        ghosts[0].pos = state.pacman.pos + Vec2::new(26.0, 0.0);
        ghosts[0].direction = Direction::Right;
        state.ghosts = ghosts;
        // Even a ghost stepping 1.5 px closer stays outside 24 px
        tick(&mut state, &MazeInput::default(), DT);
        assert!(!state.is_over());
    }

    #[test]
    fn test_tunnel_wrap() {
        let mut state = empty_classic();
        state.pacman.pos = Vec2::new(0.0, 14.0 * 16.0);
        let input = holding(Direction::Left);
        for _ in 0..12 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.pacman.pos.x, -24.0);
        tick(&mut state, &input, DT);
        assert_eq!(state.pacman.pos.x, 28.0 * 16.0);
        tick(&mut state, &input, DT);
        assert_eq!(state.pacman.pos.x, 28.0 * 16.0 - 2.0);
    }

    #[test]
    fn test_ghosts_never_enter_walls() {
        let config = MazeConfig {
            lives: 255,
            ..Default::default()
        };
        let mut state = MazeState::new(config, 77).unwrap();
        for _ in 0..2000 {
            tick(&mut state, &MazeInput::default(), DT);
            for ghost in &state.ghosts {
                assert!(
                    state.maze.is_passable(ghost.pos, 16.0),
                    "{} at {:?}",
                    ghost.name,
                    ghost.pos
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_ghost_paths() {
        let mut a = MazeState::new(MazeConfig::default(), 5).unwrap();
        let mut b = a.clone();
        for _ in 0..300 {
            tick(&mut a, &MazeInput::default(), DT);
            tick(&mut b, &MazeInput::default(), DT);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_frozen_then_reset() {
        let mut state = MazeState::new(MazeConfig::default(), 3).unwrap();
        let fresh = state.clone();
        state.ghosts[0].pos = state.pacman.pos;
        tick(&mut state, &MazeInput::default(), DT);
        assert!(state.is_over());

        let frozen = state.clone();
        for _ in 0..10 {
            assert!(tick(&mut state, &holding(Direction::Left), DT).is_empty());
        }
        assert_eq!(state, frozen);

        let mut input = MazeInput::default();
        input.apply(InputEvent::Action);
        let events = tick(&mut state, &input, DT);
        assert_eq!(events, vec![MazeEvent::Reset]);
        assert_eq!(state, fresh);
    }

    #[test]
    fn test_start_screen() {
        let config = MazeConfig {
            start_screen: true,
            ..Default::default()
        };
        let mut state = MazeState::new(config, 3).unwrap();
        let initial = state.clone();
        tick(&mut state, &MazeInput::default(), DT);
        assert_eq!(state, initial);

        let events = tick(&mut state, &holding(Direction::Left), DT);
        assert_eq!(events, vec![MazeEvent::Started]);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.pacman, initial.pacman);
    }

    #[test]
    fn test_score_monotonic_while_running() {
        let config = MazeConfig {
            lives: 3,
            ..Default::default()
        };
        let mut state = MazeState::new(config, 12).unwrap();
        let mut last = 0;
        for i in 0..1500 {
            let direction = Direction::ALL[(i / 40) % 4];
            tick(&mut state, &holding(direction), DT);
            assert!(state.score >= last);
            last = state.score;
        }
    }

    #[test]
    fn test_wrap_x() {
        assert_eq!(wrap_x(-24.0, 24.0, 448.0), -24.0);
        assert_eq!(wrap_x(-24.5, 24.0, 448.0), 448.0);
        assert_eq!(wrap_x(448.5, 24.0, 448.0), -24.0);
        assert_eq!(wrap_x(100.0, 24.0, 448.0), 100.0);
    }
}
