//! Geometry primitives used across stackscroll.
//!
//! All lengths are `f32` layout units. Coordinates grow rightward and
//! downward, with the origin at the top left of the parent's bounds.

/// Error types for geometry operations.
mod error;
/// Edge insets.
mod insets;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use error::{Error, Result};
pub use insets::Insets;
pub use point::Point;
pub use rect::Rect;
pub use size::Size;
