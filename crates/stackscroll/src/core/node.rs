use crate::{
    core::id::{TypedId, ViewId},
    geom::{Insets, Point, Rect, Size},
    wrapper::SizeObservingWrapper,
};

/// A view with a box-model intrinsic size.
///
/// The measured height is used verbatim by the stacking container; the width
/// is the width the container offers after applying the entry's inset.
pub trait Measure: Send {
    /// Natural size of the view when laid out at `width`.
    fn measure(&self, width: f32) -> Size;
}

impl<F> Measure for F
where
    F: Fn(f32) -> Size + Send,
{
    fn measure(&self, width: f32) -> Size {
        self(width)
    }
}

/// A view whose intrinsic height does not depend on the offered width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(pub Size);

impl Measure for Fixed {
    fn measure(&self, width: f32) -> Size {
        Size::new(width, self.0.h)
    }
}

/// Content hosted inside a scroll surface.
///
/// Providers that lay themselves out (reflowing text, web content) implement
/// this so that a layout pass over the surface recomputes its content size
/// for the current bounds. Providers that track their own size simply call
/// `Core::set_content_size` instead.
pub trait SurfaceContent: Send {
    /// Content size for a surface whose bounds are `bounds`.
    fn content_size(&mut self, bounds: Size) -> Size;
}

impl<F> SurfaceContent for F
where
    F: FnMut(Size) -> Size + Send,
{
    fn content_size(&mut self, bounds: Size) -> Size {
        self(bounds)
    }
}

/// The scrollable viewport inside any scrollable content provider.
pub struct ScrollSurface {
    /// Size of the scrollable content.
    pub(crate) content_size: Size,
    /// Insets around the content.
    pub(crate) content_insets: Insets,
    /// Current scroll offset.
    pub(crate) content_offset: Point,
    /// Whether the user can scroll this surface.
    pub(crate) user_scroll_enabled: bool,
    /// Whether scrolling past the content edge bounces back.
    pub(crate) bounces: bool,
    /// Whether the vertical indicator is drawn.
    pub(crate) shows_vertical_indicator: bool,
    /// Whether the horizontal indicator is drawn.
    pub(crate) shows_horizontal_indicator: bool,
    /// Natural width, if the surface has one.
    pub(crate) intrinsic_width: Option<f32>,
    /// Self-laying-out content, if any.
    pub(crate) content: Option<Box<dyn SurfaceContent>>,
}

impl Default for ScrollSurface {
    fn default() -> Self {
        Self {
            content_size: Size::zero(),
            content_insets: Insets::default(),
            content_offset: Point::zero(),
            user_scroll_enabled: true,
            bounces: true,
            shows_vertical_indicator: true,
            shows_horizontal_indicator: true,
            intrinsic_width: None,
            content: None,
        }
    }
}

impl ScrollSurface {
    /// A surface with default flags and no content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: initial content size.
    pub fn with_content_size(mut self, size: Size) -> Self {
        self.content_size = size;
        self
    }

    /// Builder: content insets.
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.content_insets = insets;
        self
    }

    /// Builder: self-laying-out content.
    pub fn with_content(mut self, content: impl SurfaceContent + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Builder: bounce behaviour.
    pub fn with_bounces(mut self, bounces: bool) -> Self {
        self.bounces = bounces;
        self
    }

    /// Builder: scroll indicator visibility.
    pub fn with_indicators(mut self, vertical: bool, horizontal: bool) -> Self {
        self.shows_vertical_indicator = vertical;
        self.shows_horizontal_indicator = horizontal;
        self
    }

    /// Builder: natural width.
    pub fn with_intrinsic_width(mut self, width: f32) -> Self {
        self.intrinsic_width = Some(width);
        self
    }

    /// Size of the scrollable content.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Insets around the content.
    pub fn content_insets(&self) -> Insets {
        self.content_insets
    }

    /// Current scroll offset.
    pub fn content_offset(&self) -> Point {
        self.content_offset
    }

    /// Whether the user can scroll this surface.
    pub fn is_user_scroll_enabled(&self) -> bool {
        self.user_scroll_enabled
    }

    /// Whether scrolling past the content edge bounces back.
    pub fn bounces(&self) -> bool {
        self.bounces
    }

    /// Scroll indicator visibility as `(vertical, horizontal)`.
    pub fn indicators(&self) -> (bool, bool) {
        (
            self.shows_vertical_indicator,
            self.shows_horizontal_indicator,
        )
    }

    /// Natural width, if the surface has one.
    pub fn intrinsic_width(&self) -> Option<f32> {
        self.intrinsic_width
    }

    /// Content height plus vertical insets, never negative.
    pub fn inset_content_height(&self) -> f32 {
        (self.content_size.h + self.content_insets.vertical()).max(0.0)
    }
}

/// Handle to a web-content view and the scroll surface it delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebContentView {
    /// The outer web-content view.
    pub view: ViewId,
    /// The internal scroll surface.
    pub surface: TypedId<ScrollSurface>,
}

/// Behaviour attached to a node.
pub enum ViewKind {
    /// A box-model view with an intrinsic size.
    Plain(Box<dyn Measure>),
    /// A fixed-height gap.
    Spacer(f32),
    /// A scroll surface.
    Surface(ScrollSurface),
    /// A web-content view; its internal surface is its child.
    WebContent {
        /// The internal scroll surface.
        surface: ViewId,
    },
    /// A generic view whose children fill its bounds.
    Composite,
    /// The content view of a stacking container; its children are positioned
    /// by the container, not by the generic layout pass.
    Stack,
    /// A size-observing wrapper around one scrollable child.
    Wrapper(SizeObservingWrapper),
}

impl ViewKind {
    /// Short label used in dumps and traces.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain",
            Self::Spacer(_) => "spacer",
            Self::Surface(_) => "surface",
            Self::WebContent { .. } => "web",
            Self::Composite => "composite",
            Self::Stack => "stack",
            Self::Wrapper(_) => "wrapper",
        }
    }
}

/// Core node data stored in the arena.
pub struct Node {
    /// View behaviour and state.
    pub(crate) kind: ViewKind,
    /// Parent in the arena tree.
    pub(crate) parent: Option<ViewId>,
    /// Children in the arena tree.
    pub(crate) children: Vec<ViewId>,
    /// Frame relative to the parent's bounds.
    pub(crate) frame: Rect,
    /// Margin guide used by children that ask for edge margins.
    pub(crate) layout_margins: Insets,
    /// Whether the subtree rooted here has pending layout.
    pub(crate) needs_layout: bool,
    /// Debug name.
    pub(crate) name: String,
}

impl Node {
    /// Build a detached node.
    pub(crate) fn new(name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            frame: Rect::zero(),
            layout_margins: Insets::default(),
            needs_layout: true,
            name: name.into(),
        }
    }

    /// Return the node's debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the node's kind.
    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[ViewId] {
        &self.children
    }

    /// Return the frame relative to the parent's bounds.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Return the margin guide insets.
    pub fn layout_margins(&self) -> Insets {
        self.layout_margins
    }

    /// Return true if this node has pending layout.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Return the scroll surface state if this node is a surface.
    pub fn surface(&self) -> Option<&ScrollSurface> {
        match &self.kind {
            ViewKind::Surface(s) => Some(s),
            _ => None,
        }
    }

    /// Return the wrapper state if this node is a wrapper.
    pub fn wrapper(&self) -> Option<&SizeObservingWrapper> {
        match &self.kind {
            ViewKind::Wrapper(w) => Some(w),
            _ => None,
        }
    }
}
