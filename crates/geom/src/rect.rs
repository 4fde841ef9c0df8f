use serde::{Deserialize, Serialize};

use super::{Insets, Point, Size};

/// A rectangle with an origin and a size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Construct a rect from its components.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(w, h),
        }
    }

    /// The zero rect.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.w
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.h
    }

    /// Width.
    pub fn width(&self) -> f32 {
        self.size.w
    }

    /// Height.
    pub fn height(&self) -> f32 {
        self.size.h
    }

    /// The same extent located at the origin.
    pub fn bounds(&self) -> Self {
        self.size.rect()
    }

    /// Shrink the rect by `insets` on every side. Dimensions never go below
    /// zero.
    pub fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.origin.x + insets.left,
            self.origin.y + insets.top,
            (self.size.w - insets.horizontal()).max(0.0),
            (self.size.h - insets.vertical()).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.bounds(), Rect::new(0.0, 0.0, 30.0, 40.0));
    }

    #[test]
    fn inset_saturates() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.inset(Insets::uniform(2.0)), Rect::new(2.0, 2.0, 6.0, 6.0));
        assert_eq!(r.inset(Insets::uniform(8.0)), Rect::new(8.0, 8.0, 0.0, 0.0));
    }
}
