//! Events delivered to the host run loop.

use std::fmt;

use crate::{
    core::{id::ViewId, node::SurfaceContent},
    geom::{Rect, Size},
};

/// An event for the UI execution context.
///
/// Producers on other threads never touch views directly; they post one of
/// these and the run loop applies it.
pub enum Event {
    /// Set a surface's content size.
    ContentSize {
        /// Target surface.
        surface: ViewId,
        /// New content size.
        size: Size,
    },
    /// Replace a surface's self-laying-out content.
    SurfaceContent {
        /// Target surface.
        surface: ViewId,
        /// New content.
        content: Box<dyn SurfaceContent>,
    },
    /// The container's frame changed.
    Resize(Rect),
    /// A debounced action may be due.
    Settle,
    /// Stop the run loop.
    Shutdown,
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContentSize { surface, size } => f
                .debug_struct("ContentSize")
                .field("surface", surface)
                .field("size", size)
                .finish(),
            Self::SurfaceContent { surface, .. } => f
                .debug_struct("SurfaceContent")
                .field("surface", surface)
                .finish_non_exhaustive(),
            Self::Resize(r) => f.debug_tuple("Resize").field(r).finish(),
            Self::Settle => f.write_str("Settle"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
