use serde::{Deserialize, Serialize};

use super::error::check_length;
use crate::Result;

/// Distances inset from each edge of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    /// Top inset.
    pub top: f32,
    /// Left inset.
    pub left: f32,
    /// Bottom inset.
    pub bottom: f32,
    /// Right inset.
    pub right: f32,
}

impl Insets {
    /// Construct insets without validation.
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Construct insets, rejecting negative or non-finite values.
    pub fn try_new(top: f32, left: f32, bottom: f32, right: f32) -> Result<Self> {
        Ok(Self {
            top: check_length("top", top)?,
            left: check_length("left", left)?,
            bottom: check_length("bottom", bottom)?,
            right: check_length("right", right)?,
        })
    }

    /// Equal insets on all four edges.
    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Equal left and right insets, zero top and bottom.
    pub const fn horizontal_only(v: f32) -> Self {
        Self::new(0.0, v, 0.0, v)
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sums(t in 0f32..100.0, l in 0f32..100.0, b in 0f32..100.0, r in 0f32..100.0) {
            let i = Insets::try_new(t, l, b, r).unwrap();
            prop_assert_eq!(i.vertical(), t + b);
            prop_assert_eq!(i.horizontal(), l + r);
        }
    }

    #[test]
    fn rejects_negative() {
        assert!(Insets::try_new(0.0, -1.0, 0.0, 0.0).is_err());
    }
}
