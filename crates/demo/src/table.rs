use stackscroll::{EventSender, ScrollSurface, SurfaceContent, TypedId, error::Result, geom::Size};

/// Height of one table row.
pub const ROW_HEIGHT: f32 = 44.0;
/// Height of the grouped section header.
pub const SECTION_HEADER: f32 = 36.0;
/// Height of the grouped section footer.
pub const SECTION_FOOTER: f32 = 18.0;

/// A grouped, single-section table of `rows` equal rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table {
    /// Table tag, shown in row titles.
    pub tag: usize,
    /// Number of rows.
    pub rows: usize,
}

impl Table {
    /// Title of one row.
    pub fn row_title(&self, row: usize) -> String {
        format!("tag: {}, row: {row},", self.tag)
    }

    /// Height of the whole table.
    pub fn height(&self) -> f32 {
        SECTION_HEADER + self.rows as f32 * ROW_HEIGHT + SECTION_FOOTER
    }
}

impl SurfaceContent for Table {
    fn content_size(&mut self, bounds: Size) -> Size {
        Size::new(bounds.w, self.height())
    }
}

/// Drives one table from a producer thread: row edits are posted to the
/// host as new table content.
#[derive(Debug, Clone)]
pub struct TableController {
    /// The table's surface.
    surface: TypedId<ScrollSurface>,
    /// Current table state.
    table: Table,
    /// Handle to the host.
    tx: EventSender,
}

impl TableController {
    /// Construct a controller for a table already shown on `surface`.
    pub fn new(surface: TypedId<ScrollSurface>, table: Table, tx: EventSender) -> Self {
        Self { surface, table, tx }
    }

    /// Current row count.
    pub fn rows(&self) -> usize {
        self.table.rows
    }

    /// Append one row.
    pub fn insert(&mut self) -> Result<()> {
        self.table.rows += 1;
        tracing::debug!(tag = self.table.tag, rows = self.table.rows, "row inserted");
        self.tx.surface_content(self.surface, self.table)
    }

    /// Delete row `row`. Rows past the end are ignored.
    pub fn delete(&mut self, row: usize) -> Result<()> {
        if row >= self.table.rows {
            return Ok(());
        }
        self.table.rows -= 1;
        tracing::debug!(tag = self.table.tag, row, "row deleted");
        self.tx.surface_content(self.surface, self.table)
    }
}
