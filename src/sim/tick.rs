//! Simulation tick
//!
//! Physics is per tick, not scaled by wall-clock time. `dt_ms` only feeds the
//! elapsed-time spawn gate.

use super::collision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::input::{InputEvent, InputLatch};

/// Input latched since the previous tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Flap (or leave the start screen)
    pub flap: bool,
    /// Restart, honoured only once the game is over
    pub reset: bool,
    /// Idle/demo mode - the autopilot decides when to flap
    pub autopilot: bool,
}

impl InputLatch for TickInput {
    fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Flap => self.flap = true,
            InputEvent::Reset => self.reset = true,
            InputEvent::Action => {
                self.flap = true;
                self.reset = true;
            }
            InputEvent::Press(_) | InputEvent::Release(_) => {}
        }
    }

    fn clear_one_shots(&mut self) {
        self.flap = false;
        self.reset = false;
    }
}

/// Advance the game state by one tick in place, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let flap = if input.autopilot {
        autopilot_flap(state)
    } else {
        input.flap
    };

    match state.phase {
        GamePhase::Over => {
            if input.reset {
                *state = state.restarted();
                log::info!("Game reset (seed {})", state.seed);
                events.push(GameEvent::Reset);
            }
            return events;
        }
        GamePhase::NotStarted => {
            if flap {
                state.phase = GamePhase::Running;
                log::info!("Game started");
                events.push(GameEvent::Started);
            }
            return events;
        }
        GamePhase::Running => {}
    }

    state.time_ticks += 1;

    // Gravity first, then a flap overrides the velocity outright
    state.bird.velocity += state.config.gravity;
    if flap {
        state.bird.velocity = state.config.impulse;
        events.push(GameEvent::Flapped);
    }
    state.bird.pos.y += state.bird.velocity;

    let newest_pipe_x = state.pipes.last().map(|p| p.x);
    let surface_width = state.config.surface_width;
    let policy = state.config.spawn;
    if state
        .spawn_gate
        .advance(&policy, newest_pipe_x, surface_width, dt_ms)
    {
        let pipe = state.spawn_pipe();
        log::debug!("Pipe {} spawned, gap top {:.1}", pipe.id, pipe.gap_top);
        events.push(GameEvent::PipeSpawned {
            id: pipe.id,
            gap_top: pipe.gap_top,
        });
    }

    let speed = state.config.pipe_speed;
    for pipe in &mut state.pipes {
        pipe.x -= speed;
    }
    state.pipes.retain(|p| p.trailing_edge() >= 0.0);

    if let Some(kind) =
        collision::check_bird(&state.bird, &state.pipes, state.config.surface_height)
    {
        state.phase = GamePhase::Over;
        log::info!(
            "Game over after {} ticks: {:?}, score {}",
            state.time_ticks,
            kind,
            state.score.points()
        );
        events.push(GameEvent::Collided {
            kind,
            score: state.score,
        });
        return events;
    }

    let bird_left = state.bird.left();
    let unit = state.config.scoring;
    for pipe in &mut state.pipes {
        if !pipe.scored && pipe.trailing_edge() < bird_left {
            pipe.scored = true;
            state.score.add(unit);
            log::debug!("Cleared pipe {}, score {}", pipe.id, state.score.points());
            events.push(GameEvent::Scored {
                id: pipe.id,
                score: state.score,
            });
        }
    }

    log::trace!(
        "tick {}: y={:.2} v={:.2} pipes={}",
        state.time_ticks,
        state.bird.pos.y,
        state.bird.velocity,
        state.pipes.len()
    );

    events
}

/// Pure form of [`tick`]: returns the next state, leaving `state` untouched
pub fn step(state: &GameState, input: &TickInput, dt_ms: f32) -> GameState {
    let mut next = state.clone();
    tick(&mut next, input, dt_ms);
    next
}

/// Safety margin the autopilot keeps above the gap bottom
const AUTOPILOT_MARGIN: f32 = 15.0;

/// Demo-mode flap decision: hold the bird just above the next gap's bottom
pub fn autopilot_flap(state: &GameState) -> bool {
    match state.phase {
        GamePhase::NotStarted => return true,
        GamePhase::Over => return false,
        GamePhase::Running => {}
    }

    let bird = &state.bird;
    let floor = state
        .pipes
        .iter()
        .find(|p| p.trailing_edge() >= bird.left())
        .map(|p| p.gap_bottom())
        .unwrap_or(state.config.surface_height * 0.6);

    // Keep climbing while still rising slowly so high gaps are reachable
    let climb_limit = state.config.impulse / 2.0;
    bird.bottom() > floor - AUTOPILOT_MARGIN && bird.velocity > climb_limit
}
