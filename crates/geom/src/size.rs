use serde::{Deserialize, Serialize};

use super::{Point, Rect, error::check_length};
use crate::Result;

/// A `Size` is a rectangle that has a width and height but no location.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Size {
    /// Construct a size without validation.
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Construct a size, rejecting negative or non-finite dimensions.
    pub fn try_new(w: f32, h: f32) -> Result<Self> {
        Ok(Self {
            w: check_length("width", w)?,
            h: check_length("height", h)?,
        })
    }

    /// The zero size.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            origin: Point::zero(),
            size: *self,
        }
    }

    /// A copy of this size with a different height.
    pub fn with_height(&self, h: f32) -> Self {
        Self { w: self.w, h }
    }
}

impl From<(f32, f32)> for Size {
    fn from(v: (f32, f32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn try_new_rejects_bad_lengths() {
        assert!(Size::try_new(10.0, 0.0).is_ok());
        assert!(matches!(
            Size::try_new(-1.0, 0.0),
            Err(Error::Negative { field: "width", .. })
        ));
        assert!(matches!(
            Size::try_new(1.0, f32::NAN),
            Err(Error::NotFinite { field: "height" })
        ));
    }
}
