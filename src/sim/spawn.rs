//! Spawn gating for pipes

use serde::{Deserialize, Serialize};

use crate::settings::SpawnPolicy;

/// Counters behind every spawn policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnGate {
    /// Running ticks seen by the frame-count policy
    pub frames: u64,
    /// Milliseconds since the last timed spawn
    pub elapsed_ms: f32,
}

impl SpawnGate {
    /// Advance the gate by one running tick; true if a pipe should spawn now.
    ///
    /// `newest_pipe_x` is the left edge of the most recently spawned pipe.
    /// At most one spawn fires per tick whatever `dt_ms` is.
    pub fn advance(
        &mut self,
        policy: &SpawnPolicy,
        newest_pipe_x: Option<f32>,
        surface_width: f32,
        dt_ms: f32,
    ) -> bool {
        match *policy {
            SpawnPolicy::Distance { spacing } => {
                newest_pipe_x.is_none_or(|x| x < surface_width - spacing)
            }
            SpawnPolicy::FrameCount { interval } => {
                let fire = self.frames % u64::from(interval) == 0;
                self.frames += 1;
                fire
            }
            SpawnPolicy::Elapsed { interval_ms } => {
                self.elapsed_ms += dt_ms.max(0.0);
                if self.elapsed_ms > interval_ms {
                    // Keep the overshoot so the average period is exactly the
                    // interval; capping it stops a stall from bunching spawns
                    self.elapsed_ms = (self.elapsed_ms - interval_ms).min(interval_ms);
                    true
                } else {
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_gate() {
        let mut gate = SpawnGate::default();
        let policy = SpawnPolicy::Distance { spacing: 200.0 };
        assert!(gate.advance(&policy, None, 400.0, 16.0));
        assert!(!gate.advance(&policy, Some(398.0), 400.0, 16.0));
        assert!(!gate.advance(&policy, Some(200.0), 400.0, 16.0));
        assert!(gate.advance(&policy, Some(199.0), 400.0, 16.0));
    }

    #[test]
    fn test_frame_count_gate_fires_on_first_tick() {
        let mut gate = SpawnGate::default();
        let policy = SpawnPolicy::FrameCount { interval: 3 };
        let fired: Vec<bool> = (0..7)
            .map(|_| gate.advance(&policy, None, 400.0, 16.0))
            .collect();
        assert_eq!(fired, vec![true, false, false, true, false, false, true]);
    }

    #[test]
    fn test_elapsed_gate_accumulates_variable_ticks() {
        let mut gate = SpawnGate::default();
        let policy = SpawnPolicy::Elapsed { interval_ms: 100.0 };
        assert!(!gate.advance(&policy, None, 400.0, 40.0));
        assert!(!gate.advance(&policy, None, 400.0, 60.0)); // exactly 100, not past it
        assert!(gate.advance(&policy, None, 400.0, 5.0));
        assert_eq!(gate.elapsed_ms, 5.0);
    }

    #[test]
    fn test_elapsed_gate_never_double_spawns_after_stall() {
        let mut gate = SpawnGate::default();
        let policy = SpawnPolicy::Elapsed { interval_ms: 100.0 };
        // A 1 second hitch spawns once; at most one interval of backlog survives
        assert!(gate.advance(&policy, None, 400.0, 1000.0));
        assert_eq!(gate.elapsed_ms, 100.0);
        assert!(gate.advance(&policy, None, 400.0, 16.0));
        assert_eq!(gate.elapsed_ms, 16.0);
        let spawns = (0..5)
            .filter(|_| gate.advance(&policy, None, 400.0, 16.0))
            .count();
        assert_eq!(spawns, 0);
        assert!(gate.advance(&policy, None, 400.0, 16.0));
    }

    #[test]
    fn test_elapsed_gate_keeps_average_period() {
        let policy = SpawnPolicy::Elapsed { interval_ms: 1500.0 };
        // 61 seconds at rates that do not divide the interval evenly
        for hz in [144u32, 60, 20] {
            let mut gate = SpawnGate::default();
            let dt = 1000.0 / hz as f32;
            let spawns = (0..61 * hz)
                .filter(|_| gate.advance(&policy, None, 400.0, dt))
                .count();
            assert_eq!(spawns, 40, "{hz} Hz");
        }
    }
}
