//! Input translation
//!
//! Hosts capture raw key/pointer events asynchronously and fold them into the
//! per-tick input structs through `InputEvent`. Unknown keys are ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid direction for maze movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit step in screen space (y grows downward)
    pub fn delta(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Semantic input produced by an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Flap,
    /// Restart, only honoured once the game is over
    Reset,
    /// The single game button (space, click, tap): start, flap or restart
    Action,
    Press(Direction),
    Release(Direction),
}

impl InputEvent {
    /// Map a `KeyboardEvent.code` style key name
    pub fn from_key(code: &str, pressed: bool) -> Option<InputEvent> {
        let direction = match code {
            "ArrowUp" | "KeyW" => Some(Direction::Up),
            "ArrowRight" | "KeyD" => Some(Direction::Right),
            "ArrowDown" | "KeyS" => Some(Direction::Down),
            "ArrowLeft" | "KeyA" => Some(Direction::Left),
            _ => None,
        };
        if let Some(direction) = direction {
            return Some(if pressed {
                InputEvent::Press(direction)
            } else {
                InputEvent::Release(direction)
            });
        }

        if !pressed {
            return None;
        }
        match code {
            "Space" | "Enter" => Some(InputEvent::Action),
            "KeyR" => Some(InputEvent::Reset),
            _ => None,
        }
    }
}

/// Held direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub left: bool,
}

impl HeldDirections {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Right => self.right = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Right => self.right,
            Direction::Down => self.down,
            Direction::Left => self.left,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.right || self.down || self.left
    }
}

/// Per-tick input latch the driver hands to a simulation
pub trait InputLatch: Default + Clone {
    /// Fold one event into the latch
    fn apply(&mut self, event: InputEvent);

    /// Drop one-shot events after a tick consumed them
    fn clear_one_shots(&mut self);
}
