//! Stackscroll: a vertical stacking container for heterogeneous views.
//!
//! A [`StackingContainer`] lays out plain views and scrollable content in one
//! vertical chain inside a single outer scroll surface. Scrollable children
//! are wrapped in a [`SizeObservingWrapper`] that disables their own
//! scrolling and sizes them to their full content height, so the outer
//! surface is the only thing that scrolls.
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Size, Point, Rect, Insets)
//! - [`adapter`] - Uniform access to scrollable content
//! - [`wrapper`] - The size-observing wrapper
//! - [`container`] - The stacking container
//! - [`host`] - A run loop that owns the arena and a container

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub use stackscroll_geom as geom;

pub mod adapter;
pub mod config;
pub mod container;
pub mod host;
pub mod wrapper;

/// Fixtures for tests and demos.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use adapter::ScrollableContent;
pub use config::ContainerConfig;
pub use container::{Anchor, HorizontalInset, PumpReport, StackingContainer};
pub use core::{Core, Debouncer, SettleTimer, TypedId, ViewId};
pub use core::{dump, error, event, node, observe};
pub use host::{EventSender, Host};
pub use node::{Fixed, Measure, ScrollSurface, SurfaceContent, WebContentView};
pub use wrapper::{IntrinsicSize, SizeObservingWrapper};
