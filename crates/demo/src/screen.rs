use stackscroll::{
    EventSender, HorizontalInset, Host, ScrollSurface, ScrollableContent, TypedId, ViewId,
    WebContentView, error::Result, geom::Rect,
};

use crate::{
    config::DemoConfig,
    content::Label,
    table::{Table, TableController},
    web::WebViewBuilder,
};

/// Paragraphs of the page the demo loads into its web view.
pub const PAGE: &[&str] = &[
    "A stacking container lays out labels, pages and tables in one vertical \
     chain. Only the outer surface scrolls; everything inside it is expanded \
     to its full height.",
    "Pages arrive in pieces. Every piece changes the document height, and the \
     container waits for the changes to settle before it moves the views \
     below the page.",
    "Tables grow and shrink as rows are inserted and deleted. Their content \
     height is observed the same way as the page's.",
    "When the container is torn down, pending size updates are dropped and \
     the embedded views are released untouched.",
];

/// The demo screen: two labels, a web page and two tables.
#[derive(Debug, Clone, Copy)]
pub struct DemoScreen {
    /// Label inset by a fixed margin.
    pub fixed_label: ViewId,
    /// Label following the content margins.
    pub margin_label: ViewId,
    /// The web page.
    pub web: WebContentView,
    /// The two tables, top first.
    pub tables: [TypedId<ScrollSurface>; 2],
}

impl DemoScreen {
    /// Build the screen into the host's container.
    pub fn build(host: &mut Host, cfg: &DemoConfig) -> Result<Self> {
        let (core, container) = host.parts();
        container.set_frame(core, Rect::new(0.0, 0.0, cfg.width, cfg.height))?;

        let fixed_label = core.add_plain(
            "fixed-label",
            Label::new("Fixed size Fixed size Fixed size Fixed size Fixed size Fixed size"),
        );
        container.add_simple_view(core, fixed_label, HorizontalInset::Custom(20.0))?;

        let margin_label = core.add_plain(
            "margin-label",
            Label::new("Layout margin Layout margin Layout margin Layout margin Layout margin"),
        );
        container.add_simple_view(core, margin_label, HorizontalInset::EdgeMargin)?;

        let web = WebViewBuilder::new().build(core, "web");
        container.add_scrollable_view(
            core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::Custom(0.0),
        )?;

        let mut tables = Vec::with_capacity(2);
        for tag in 1..=2 {
            let table = Table {
                tag,
                rows: cfg.initial_rows,
            };
            let surface = core.add_scroll_surface(
                format!("table-{tag}"),
                ScrollSurface::new().with_content(table),
            );
            container.add_scrollable_view(
                core,
                ScrollableContent::from_scroll_surface(surface),
                HorizontalInset::Custom(0.0),
            )?;
            tables.push(surface);
        }
        tracing::info!(entries = container.len(), "demo screen built");
        Ok(Self {
            fixed_label,
            margin_label,
            web,
            tables: [tables[0], tables[1]],
        })
    }

    /// Controllers for the two tables, posting through `tx`.
    pub fn controllers(&self, tx: &EventSender, initial_rows: usize) -> [TableController; 2] {
        [1, 2].map(|tag| {
            TableController::new(
                self.tables[tag - 1],
                Table {
                    tag,
                    rows: initial_rows,
                },
                tx.clone(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use stackscroll::{ContainerConfig, geom::Size};

    use super::*;
    use crate::table::{ROW_HEIGHT, SECTION_FOOTER, SECTION_HEADER};

    fn config() -> DemoConfig {
        DemoConfig {
            container: ContainerConfig::default().with_settle_delay(Duration::from_millis(10)),
            ..DemoConfig::default()
        }
    }

    #[test]
    fn tables_stack_below_page() -> Result<()> {
        let cfg = config();
        let mut host = Host::new(cfg.container.clone())?;
        let screen = DemoScreen::build(&mut host, &cfg)?;
        host.run_until_idle(Duration::from_secs(5))?;

        let entries = host.container().entries();
        assert_eq!(entries.len(), 5);
        let table_h = SECTION_HEADER + 5.0 * ROW_HEIGHT + SECTION_FOOTER;
        let first = host.core().frame(entries[3].root()).expect("first table");
        let second = host.core().frame(entries[4].root()).expect("second table");
        assert_eq!(first.height(), table_h);
        assert_eq!(second.top(), first.bottom());

        let [mut top, _] = screen.controllers(&host.sender(), cfg.initial_rows);
        top.insert()?;
        host.run_until_idle(Duration::from_secs(5))?;
        let second = host
            .core()
            .frame(host.container().entries()[4].root())
            .map(|f| f.top());
        assert_eq!(second, Some(first.bottom() + ROW_HEIGHT));
        assert_eq!(
            host.core().frame(screen.web.view).map(|f| f.size),
            Some(Size::new(cfg.width, 0.0))
        );
        Ok(())
    }
}
