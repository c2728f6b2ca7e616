//! Basic geometric types shared by schematic and board records.

use serde::{Deserialize, Serialize};

/// A 2D point or size in board/schematic units (millimetres).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A position with an orientation, the format's `(at x y [rotation])` form.
///
/// The rotation is in degrees and defaults to `0` when the source omits it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct At {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl At {
    pub fn new(x: f64, y: f64, rotation: f64) -> Self {
        Self { x, y, rotation }
    }

    /// The position component, without the rotation.
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_default_is_origin() {
        let at = At::default();
        assert_eq!(at.x, 0.0);
        assert_eq!(at.y, 0.0);
        assert_eq!(at.rotation, 0.0);
    }

    #[test]
    fn test_at_position() {
        let at = At::new(1.5, -2.0, 90.0);
        assert_eq!(at.position(), Vec2::new(1.5, -2.0));
    }
}
