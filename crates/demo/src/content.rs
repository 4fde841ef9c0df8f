use stackscroll::{Measure, SurfaceContent, geom::Size};

/// Width of one character cell, in layout units.
pub const CHAR_WIDTH: f32 = 8.0;
/// Height of one text line, in layout units.
pub const LINE_HEIGHT: f32 = 18.0;

/// Number of lines `text` occupies when wrapped to `width`.
pub fn wrapped_lines(text: &str, width: f32) -> usize {
    let cols = ((width / CHAR_WIDTH).floor() as usize).max(1);
    textwrap::wrap(text, cols).len()
}

/// A multi-line label: wraps its text to the offered width.
#[derive(Debug, Clone)]
pub struct Label {
    /// Label text.
    text: String,
    /// Vertical padding above and below the text.
    padding: f32,
}

impl Label {
    /// Construct a label with a little vertical padding.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            padding: 4.0,
        }
    }
}

impl Measure for Label {
    fn measure(&self, width: f32) -> Size {
        let lines = wrapped_lines(&self.text, width);
        Size::new(width, lines as f32 * LINE_HEIGHT + self.padding * 2.0)
    }
}

/// A document that reflows to the width of the surface showing it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Paragraphs, in order.
    paragraphs: Vec<String>,
    /// Space between paragraphs.
    spacing: f32,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
            spacing: LINE_HEIGHT,
        }
    }

    /// Builder: append a paragraph.
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// True if the document has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Height of the document laid out at `width`.
    pub fn height_at(&self, width: f32) -> f32 {
        let lines: usize = self
            .paragraphs
            .iter()
            .map(|p| wrapped_lines(p, width))
            .sum();
        let gaps = self.paragraphs.len().saturating_sub(1) as f32;
        lines as f32 * LINE_HEIGHT + gaps * self.spacing
    }
}

impl SurfaceContent for Document {
    fn content_size(&mut self, bounds: Size) -> Size {
        Size::new(bounds.w, self.height_at(bounds.w))
    }
}
