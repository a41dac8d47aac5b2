//! Fixed timestep driver
//!
//! Hosts feed wall-clock frame times and raw input events in; the driver
//! turns them into whole simulation ticks of [`FRAME_MS`] each.

use crate::consts::{FRAME_MS, MAX_FRAME_MS, MAX_SUBSTEPS};
use crate::input::{InputEvent, InputLatch};
use crate::maze::{MazeEvent, MazeInput, MazeState};
use crate::sim::{GameEvent, GameState, TickInput};

/// A game that advances one fixed tick at a time
pub trait Simulation {
    type Input: InputLatch;
    type Event;

    fn advance(&mut self, input: &Self::Input, dt_ms: f32) -> Vec<Self::Event>;
}

impl Simulation for GameState {
    type Input = TickInput;
    type Event = GameEvent;

    fn advance(&mut self, input: &TickInput, dt_ms: f32) -> Vec<GameEvent> {
        crate::sim::tick(self, input, dt_ms)
    }
}

impl Simulation for MazeState {
    type Input = MazeInput;
    type Event = MazeEvent;

    fn advance(&mut self, input: &MazeInput, dt_ms: f32) -> Vec<MazeEvent> {
        crate::maze::tick(self, input, dt_ms)
    }
}

/// Runs a simulation at a fixed rate regardless of display refresh
pub struct FixedStepDriver<S: Simulation> {
    pub sim: S,
    pub input: S::Input,
    accumulator: f32,
}

impl<S: Simulation> FixedStepDriver<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            input: S::Input::default(),
            accumulator: 0.0,
        }
    }

    /// Latch an input event for the next tick
    pub fn handle(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Run every tick owed for `elapsed_ms` of wall time.
    ///
    /// Frames longer than [`MAX_FRAME_MS`] are clamped, which keeps the owed
    /// ticks under [`MAX_SUBSTEPS`].
    pub fn frame(&mut self, elapsed_ms: f32) -> Vec<S::Event> {
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        self.accumulator += elapsed_ms;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            events.extend(self.sim.advance(&input, FRAME_MS));
            self.accumulator -= FRAME_MS;
            substeps += 1;

            // One-shot inputs fire on a single tick only
            self.input.clear_one_shots();
        }
        events
    }

    /// Run exactly one tick, for headless hosts that own their clock
    pub fn step_once(&mut self) -> Vec<S::Event> {
        let input = self.input.clone();
        let events = self.sim.advance(&input, FRAME_MS);
        self.input.clear_one_shots();
        events
    }

    /// Forget any partial tick, e.g. after the page was hidden
    pub fn reset_clock(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FlappyConfig, FlappyPreset, MazeConfig};
    use crate::sim::GamePhase;

    /// Counts ticks and remembers the input each tick saw
    #[derive(Default)]
    struct Counter {
        ticks: u32,
        flaps: u32,
    }

    impl Simulation for Counter {
        type Input = TickInput;
        type Event = u32;

        fn advance(&mut self, input: &TickInput, _dt_ms: f32) -> Vec<u32> {
            self.ticks += 1;
            if input.flap {
                self.flaps += 1;
            }
            vec![self.ticks]
        }
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut driver = FixedStepDriver::new(Counter::default());
        assert!(driver.frame(10.0).is_empty());
        assert_eq!(driver.frame(10.0), vec![1]);
        assert_eq!(driver.frame(FRAME_MS * 2.0), vec![2, 3]);
    }

    #[test]
    fn test_one_shot_consumed_once() {
        let mut driver = FixedStepDriver::new(Counter::default());
        driver.handle(InputEvent::Flap);
        driver.frame(FRAME_MS * 3.5);
        assert_eq!(driver.sim.ticks, 3);
        assert_eq!(driver.sim.flaps, 1);
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut driver = FixedStepDriver::new(Counter::default());
        let events = driver.frame(10_000.0);
        // 100 ms is six ticks, give or take float rounding
        assert!((5..=6).contains(&events.len()));
        assert!(events.len() <= MAX_SUBSTEPS as usize);
        assert!(driver.frame(0.0).len() <= 1);
    }

    #[test]
    fn test_clamp_keeps_backlog_under_substep_cap() {
        // Worst case: a full clamped frame on top of an almost complete tick
        let owed = ((MAX_FRAME_MS + FRAME_MS) / FRAME_MS).floor() as u32;
        assert!(owed < MAX_SUBSTEPS);

        let mut driver = FixedStepDriver::new(Counter::default());
        driver.frame(FRAME_MS - 0.01);
        let ticks: usize = (0..20).map(|_| driver.frame(10_000.0).len()).sum();
        // Every frame is paid in full, nothing is left over to replay
        assert!((119..=121).contains(&ticks), "{ticks}");
        assert!(driver.frame(0.0).len() <= 1);
    }

    #[test]
    fn test_reset_clock_drops_partial_tick() {
        let mut driver = FixedStepDriver::new(Counter::default());
        assert!(driver.frame(FRAME_MS - 1.0).is_empty());
        driver.reset_clock();
        assert!(driver.frame(2.0).is_empty());
        assert_eq!(driver.frame(FRAME_MS), vec![1]);
    }

    #[test]
    fn test_bad_elapsed_is_ignored() {
        let mut driver = FixedStepDriver::new(Counter::default());
        assert!(driver.frame(f32::NAN).is_empty());
        assert!(driver.frame(-50.0).is_empty());
        assert_eq!(driver.sim.ticks, 0);
    }

    #[test]
    fn test_drives_flappy_to_start() {
        let config = FlappyConfig::from_preset(FlappyPreset::StartScreen);
        let state = GameState::new(config, 4).unwrap();
        let mut driver = FixedStepDriver::new(state);
        assert!(driver.step_once().is_empty());
        assert_eq!(driver.sim.phase, GamePhase::NotStarted);

        driver.handle(InputEvent::Action);
        let events = driver.step_once();
        assert_eq!(events, vec![GameEvent::Started]);
        assert_eq!(driver.sim.phase, GamePhase::Running);
        assert!(!driver.input.flap);
    }

    #[test]
    fn test_held_direction_survives_ticks() {
        let state = MazeState::new(MazeConfig::default(), 4).unwrap();
        let mut driver = FixedStepDriver::new(state);
        driver.sim.ghosts.clear();
        let start_x = driver.sim.pacman.pos.x;

        driver.handle(InputEvent::Press(crate::input::Direction::Left));
        driver.step_once();
        driver.step_once();
        assert_eq!(driver.sim.pacman.pos.x, start_x - 4.0);

        driver.handle(InputEvent::Release(crate::input::Direction::Left));
        driver.step_once();
        assert_eq!(driver.sim.pacman.pos.x, start_x - 4.0);
    }
}
