//! Collision detection
//!
//! Birds and pipes are axis-aligned boxes; maze actors are circles. Overlap
//! tests are strict, so touching edges do not count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bird, Pipe};

/// What the bird ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Pipe { id: u32 },
    /// Above the top of the play surface
    Ceiling,
    /// Below the bottom of the play surface
    Ground,
}

/// True if the bird and pipe share some horizontal extent
#[inline]
pub fn overlaps_horizontally(bird: &Bird, pipe: &Pipe) -> bool {
    bird.right() > pipe.x && bird.left() < pipe.trailing_edge()
}

/// True if the bird touches either solid segment of the pipe
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    overlaps_horizontally(bird, pipe)
        && (bird.top() < pipe.gap_top || bird.bottom() > pipe.gap_bottom())
}

/// Bounds check against `[0, surface_height - bird.height]`
pub fn bounds_collision(bird: &Bird, surface_height: f32) -> Option<CollisionKind> {
    if bird.top() < 0.0 {
        Some(CollisionKind::Ceiling)
    } else if bird.bottom() > surface_height {
        Some(CollisionKind::Ground)
    } else {
        None
    }
}

/// First collision for the bird this tick, pipes checked oldest first
pub fn check_bird(bird: &Bird, pipes: &[Pipe], surface_height: f32) -> Option<CollisionKind> {
    pipes
        .iter()
        .find(|pipe| hits_pipe(bird, pipe))
        .map(|pipe| CollisionKind::Pipe { id: pipe.id })
        .or_else(|| bounds_collision(bird, surface_height))
}

/// Circle-circle overlap on centre distance
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}
