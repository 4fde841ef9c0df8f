use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A location in a parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Clamp the vertical offset into `0..=max`. A negative `max` clamps to 0.
    pub fn clamp_y(&self, max: f32) -> Self {
        Self {
            x: self.x,
            y: self.y.min(max).max(0.0),
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from(v: (f32, f32)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}
