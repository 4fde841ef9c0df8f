//! Core view state: the arena, observation, scheduling and errors.

/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Events for the host run loop.
pub mod event;
/// View ID types.
pub mod id;
/// Node data and view kinds.
pub mod node;
/// Content-size observation.
pub mod observe;
/// Debouncing and settle wakeups.
pub mod scheduler;
/// World state and layout.
pub mod world;

pub use id::{TypedId, ViewId};
pub use scheduler::{Debouncer, SettleTimer};
pub use world::Core;
