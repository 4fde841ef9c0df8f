use std::{thread, time::Duration};

use stackscroll::{Core, EventSender, ScrollSurface, WebContentView, error::Result};

use crate::content::Document;

/// Builds web-content views configured for embedding in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebViewBuilder {
    /// Whether the page bounces at its edges.
    bounces: bool,
    /// Whether scroll indicators are drawn.
    indicators: bool,
}

impl Default for WebViewBuilder {
    fn default() -> Self {
        Self {
            bounces: false,
            indicators: false,
        }
    }
}

impl WebViewBuilder {
    /// A builder with bouncing and indicators off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: edge bouncing.
    pub fn bounces(mut self, bounces: bool) -> Self {
        self.bounces = bounces;
        self
    }

    /// Builder: scroll indicators.
    pub fn indicators(mut self, indicators: bool) -> Self {
        self.indicators = indicators;
        self
    }

    /// Add a detached web-content view with an empty page.
    pub fn build(&self, core: &mut Core, name: &str) -> WebContentView {
        core.add_web_content(
            name,
            ScrollSurface::new()
                .with_bounces(self.bounces)
                .with_indicators(self.indicators, self.indicators)
                .with_content(Document::new()),
        )
    }
}

/// Simulate a page load on a background thread: the page arrives one
/// paragraph at a time, each posted to the host as new content.
pub fn load_page(
    tx: EventSender,
    web: WebContentView,
    paragraphs: Vec<String>,
    chunk_delay: Duration,
) -> thread::JoinHandle<Result<()>> {
    thread::spawn(move || {
        let mut doc = Document::new();
        for p in paragraphs {
            thread::sleep(chunk_delay);
            doc = doc.with_paragraph(p);
            tx.surface_content(web.surface, doc.clone())?;
        }
        tracing::debug!(paragraphs = doc.len(), "page loaded");
        Ok(())
    })
}
