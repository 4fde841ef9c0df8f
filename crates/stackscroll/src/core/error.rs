use std::{result::Result as StdResult, sync::mpsc};

use thiserror::Error;

use crate::{ViewId, geom};

/// Result type for stackscroll operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// A view id did not resolve to a live node.
    #[error("view not found: {0:?}")]
    NodeNotFound(ViewId),

    /// The view already has a parent.
    #[error("view already attached: {0:?}")]
    AlreadyAttached(ViewId),

    /// The attachment would make a view its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Proposed parent.
        parent: ViewId,
        /// Proposed child.
        child: ViewId,
    },

    /// The view is not a scroll surface.
    #[error("view is not a scroll surface: {0:?}")]
    NotAScrollSurface(ViewId),

    /// The scroll surface already has a content-size observer.
    #[error("scroll surface already observed: {0:?}")]
    AlreadyObserved(ViewId),

    /// An observed scroll surface cannot take back scrolling authority.
    #[error("scroll surface is observed and must not scroll: {0:?}")]
    ScrollAuthority(ViewId),

    /// A positional operation was given an index outside the entry sequence.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of entries at the time of the call.
        len: usize,
    },

    /// The view is not managed by this container.
    #[error("view is not managed by this container: {0:?}")]
    NotManaged(ViewId),

    /// Run loop failure.
    #[error("runloop: {0}")]
    RunLoop(String),

    /// Invalid configuration.
    #[error("config: {0}")]
    Config(String),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),
}

impl From<mpsc::RecvError> for Error {
    fn from(e: mpsc::RecvError) -> Self {
        Self::RunLoop(e.to_string())
    }
}

impl<T> From<mpsc::SendError<T>> for Error {
    fn from(e: mpsc::SendError<T>) -> Self {
        Self::RunLoop(e.to_string())
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
