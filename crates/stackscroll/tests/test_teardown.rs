//! Tests for tearing down containers while content is still changing.

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use stackscroll::{
        HorizontalInset, ScrollSurface, ScrollableContent, StackingContainer,
        error::Result,
        geom::{Rect, Size},
        testing::TestBed,
    };

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn removed_web_surface_leaves_no_dangling_entry() -> Result<()> {
        let mut bed = TestBed::new(320.0, 480.0);
        let web = bed.web("web", 400.0);
        let after = bed.plain("after", 40.0);
        bed.container.add_scrollable_view(
            &mut bed.core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::default(),
        )?;
        bed.container
            .add_simple_view(&mut bed.core, after, HorizontalInset::default())?;
        let t0 = Instant::now();
        bed.container.pump(&mut bed.core, t0)?;

        bed.core.set_content_size(web.surface, Size::new(320.0, 500.0))?;
        bed.container.pump(&mut bed.core, t0)?;
        assert_eq!(bed.container.pending_settles(), 1);

        // The page tears down its own surface while a settle is pending.
        bed.core.remove_subtree(web.surface)?;
        assert!(bed.core.observers().is_empty());

        let report = bed.container.pump(&mut bed.core, t0 + DELAY)?;
        assert_eq!(report.fired, 0);
        assert_eq!(bed.container.managed_subviews(), vec![after]);
        assert_eq!(bed.core.frame(after).map(|f| f.top()), Some(0.0));
        assert_eq!(bed.core.parent_of(web.view), None);
        Ok(())
    }

    #[test]
    fn content_changes_after_teardown_are_ignored() -> Result<()> {
        let mut bed = TestBed::new(320.0, 480.0);
        let web = bed.web("web", 100.0);
        bed.container.add_scrollable_view(
            &mut bed.core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::default(),
        )?;
        let t0 = Instant::now();
        bed.container.pump(&mut bed.core, t0)?;
        bed.container.remove_all_managed_subviews(&mut bed.core)?;

        bed.core.set_content_size(web.surface, Size::new(320.0, 900.0))?;
        assert_eq!(bed.core.pending_notifications(), 0);
        let report = bed.container.pump(&mut bed.core, t0 + DELAY)?;
        assert_eq!(report.notifications, 0);
        assert_eq!(report.scheduled, 0);

        // The detached content is free to scroll on its own again.
        bed.core.set_user_scroll_enabled(web.surface, true)?;
        Ok(())
    }

    #[test]
    fn detached_content_can_be_managed_again() -> Result<()> {
        let mut bed = TestBed::new(320.0, 480.0);
        let rows = bed.core.add_scroll_surface(
            "rows",
            ScrollSurface::new().with_content_size(Size::new(320.0, 200.0)),
        );
        let content = ScrollableContent::from_scroll_surface(rows);
        bed.container
            .add_scrollable_view(&mut bed.core, content, HorizontalInset::default())?;
        bed.container.remove_managed_subview(&mut bed.core, rows.id())?;
        bed.container
            .add_scrollable_view(&mut bed.core, content, HorizontalInset::Custom(4.0))?;
        bed.layout()?;
        let wrapper = bed.container.entries()[0].root();
        assert_eq!(
            bed.core.frame(wrapper),
            Some(Rect::new(4.0, 0.0, 312.0, 200.0))
        );
        assert_eq!(bed.core.observers().len(), 1);
        Ok(())
    }

    #[test]
    fn destroyed_container_drops_pending_settles() -> Result<()> {
        let mut bed = TestBed::new(320.0, 480.0);
        let web = bed.web("web", 100.0);
        bed.container.add_scrollable_view(
            &mut bed.core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::default(),
        )?;
        let t0 = Instant::now();
        bed.container.pump(&mut bed.core, t0)?;
        bed.core.set_content_size(web.surface, Size::new(320.0, 300.0))?;
        bed.container.pump(&mut bed.core, t0)?;

        let TestBed { mut core, container } = bed;
        let root = container.root();
        container.destroy(&mut core)?;
        assert!(!core.contains(root));
        assert!(core.contains(web.view));
        assert!(core.observers().is_empty());

        // A fresh container in the same arena starts clean.
        let mut next = StackingContainer::new(&mut core);
        next.set_frame(&mut core, Rect::new(0.0, 0.0, 320.0, 480.0))?;
        next.add_scrollable_view(
            &mut core,
            ScrollableContent::from_web_content(web),
            HorizontalInset::default(),
        )?;
        let report = next.pump(&mut core, t0 + DELAY)?;
        assert_eq!(report.fired, 0);
        assert!(report.laid_out);
        Ok(())
    }
}
