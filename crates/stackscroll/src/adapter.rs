//! Uniform access to heterogeneous scrollable content.

use crate::core::{
    Core,
    id::{TypedId, ViewId},
    node::{ScrollSurface, WebContentView},
};

/// A scrollable content provider seen through one capability: the internal
/// scroll surface whose content size is observed, and the outer view that is
/// placed into a container.
///
/// Callers observe [`ScrollableContent::scroll_surface`], never the
/// presentable view; for web and composite content the two differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollableContent {
    /// A raw scroll surface, presented as itself.
    Surface(TypedId<ScrollSurface>),
    /// Web content whose internal surface is delegated.
    WebContent(WebContentView),
    /// A composite view containing an internal scroll surface.
    Composite {
        /// The composite view.
        view: ViewId,
        /// The surface found inside it.
        surface: TypedId<ScrollSurface>,
    },
}

impl ScrollableContent {
    /// Present a scroll surface directly.
    pub fn from_scroll_surface(surface: TypedId<ScrollSurface>) -> Self {
        Self::Surface(surface)
    }

    /// Present a web-content view, observing its internal surface.
    pub fn from_web_content(view: WebContentView) -> Self {
        Self::WebContent(view)
    }

    /// Present a composite view, observing the first of its immediate
    /// children that is a scroll surface. Returns `None` if there is none.
    pub fn from_composite(core: &Core, view: impl Into<ViewId>) -> Option<Self> {
        let view = view.into();
        let surface = core
            .children_of(view)
            .iter()
            .copied()
            .find(|c| core.surface(*c).is_some())?;
        Some(Self::Composite {
            view,
            surface: TypedId::new(surface),
        })
    }

    /// The surface whose content size is observed and whose scrolling is
    /// disabled.
    pub fn scroll_surface(&self) -> TypedId<ScrollSurface> {
        match self {
            Self::Surface(s) => *s,
            Self::WebContent(w) => w.surface,
            Self::Composite { surface, .. } => *surface,
        }
    }

    /// The view inserted into a container.
    pub fn presentable_view(&self) -> ViewId {
        match self {
            Self::Surface(s) => s.id(),
            Self::WebContent(w) => w.view,
            Self::Composite { view, .. } => *view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::node::Fixed, error::Result, geom::Size};

    #[test]
    fn surface_presents_itself() {
        let mut core = Core::new();
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        let a = ScrollableContent::from_scroll_surface(s);
        assert_eq!(a.scroll_surface(), s);
        assert_eq!(a.presentable_view(), s.id());
    }

    #[test]
    fn web_content_delegates_surface() {
        let mut core = Core::new();
        let web = core.add_web_content("web", ScrollSurface::new());
        let a = ScrollableContent::from_web_content(web);
        assert_eq!(a.presentable_view(), web.view);
        assert_eq!(a.scroll_surface(), web.surface);
        assert_ne!(a.presentable_view(), a.scroll_surface().id());
    }

    #[test]
    fn composite_finds_first_immediate_surface() -> Result<()> {
        let mut core = Core::new();
        let view = core.add_composite("table");
        let header = core.add_plain("header", Fixed(Size::new(0.0, 20.0)));
        let nested = core.add_composite("nested");
        let deep = core.add_scroll_surface("deep", ScrollSurface::new());
        let first = core.add_scroll_surface("first", ScrollSurface::new());
        let second = core.add_scroll_surface("second", ScrollSurface::new());
        core.attach(view, header)?;
        core.attach(view, nested)?;
        core.attach(nested, deep)?;
        core.attach(view, first)?;
        core.attach(view, second)?;

        let a = ScrollableContent::from_composite(&core, view).expect("surface");
        assert_eq!(a.scroll_surface(), first);
        assert_eq!(a.presentable_view(), view);
        Ok(())
    }

    #[test]
    fn composite_without_surface_is_rejected() -> Result<()> {
        let mut core = Core::new();
        let view = core.add_composite("empty");
        let nested = core.add_composite("nested");
        let deep = core.add_scroll_surface("deep", ScrollSurface::new());
        core.attach(view, nested)?;
        core.attach(nested, deep)?;
        assert_eq!(ScrollableContent::from_composite(&core, view), None);
        assert_eq!(ScrollableContent::from_composite(&core, deep), None);
        Ok(())
    }
}
