//! Fixtures for exercising containers without a real view system.

use crate::{
    StackingContainer,
    core::{
        Core,
        id::ViewId,
        node::{Fixed, ScrollSurface, SurfaceContent, WebContentView},
    },
    error::Result,
    geom::{Rect, Size},
};

/// Table-like surface content: a fixed number of equal rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rows {
    /// Number of rows.
    pub rows: usize,
    /// Height of each row.
    pub row_height: f32,
}

impl Rows {
    /// Construct row content.
    pub fn new(rows: usize, row_height: f32) -> Self {
        Self { rows, row_height }
    }
}

impl SurfaceContent for Rows {
    fn content_size(&mut self, bounds: Size) -> Size {
        Size::new(bounds.w, self.rows as f32 * self.row_height)
    }
}

/// An arena with one container laid out in a fixed viewport.
pub struct TestBed {
    /// The arena.
    pub core: Core,
    /// The container under test.
    pub container: StackingContainer,
}

impl TestBed {
    /// Build a container whose root frame is `w × h`.
    pub fn new(w: f32, h: f32) -> Self {
        let mut core = Core::new();
        let container = StackingContainer::new(&mut core);
        container
            .set_frame(&mut core, Rect::new(0.0, 0.0, w, h))
            .expect("fresh container root");
        Self { core, container }
    }

    /// Add a detached plain view of fixed height.
    pub fn plain(&mut self, name: &str, h: f32) -> ViewId {
        self.core.add_plain(name, Fixed(Size::new(0.0, h)))
    }

    /// Add a detached web-content view whose document is `h` tall.
    pub fn web(&mut self, name: &str, h: f32) -> WebContentView {
        self.core.add_web_content(
            name,
            ScrollSurface::new().with_content_size(Size::new(0.0, h)),
        )
    }

    /// Lay out the container.
    pub fn layout(&mut self) -> Result<()> {
        self.container.layout(&mut self.core)
    }
}
