use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Default sprite anchor: centre of the frame.
pub const DEFAULT_ANCHOR: Vec2 = Vec2::new(0.5, 0.5);

/// The part of a unit's sprite the motion code reads and writes.
///
/// Position is advanced by the host's physics step; the motion manager
/// only sets `velocity`, `frame` and `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Map-units / second.
    pub velocity: Vec2,
    /// Sprite-relative pivot, (0.5, 0.5) = centre.
    pub anchor: Vec2,
    /// Sprite-sheet frame index.
    pub frame: u32,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            anchor: DEFAULT_ANCHOR,
            frame: 0,
        }
    }

    /// Explicit Euler step.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}
