use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::{
    core::{
        id::{TypedId, ViewId},
        node::{Measure, Node, ScrollSurface, SurfaceContent, ViewKind, WebContentView},
        observe::{ContentSizeChange, Observers, Subscription},
    },
    error::{Error, Result},
    geom::{Insets, Point, Rect, Size},
    wrapper::SizeObservingWrapper,
};

/// The view arena: the single UI execution context's view state.
///
/// Every structural mutation, layout pass and content-size update happens
/// through `&mut Core`, which is only ever held by the UI context. Content
/// size notifications are queued here and redelivered by the owner of the
/// observation (see `StackingContainer::pump`).
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<ViewId, Node>,
    /// Live content-size subscriptions.
    pub(crate) observers: Observers,
    /// Queued content-size notifications, oldest first, at most one per
    /// subscription.
    pub(crate) notifications: VecDeque<ContentSizeChange>,
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Core {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            observers: Observers::default(),
            notifications: VecDeque::new(),
        }
    }

    /// Insert a detached node.
    fn insert(&mut self, name: impl Into<String>, kind: ViewKind) -> ViewId {
        let id = self.nodes.insert(Node::new(name, kind));
        tracing::trace!(?id, "view created");
        id
    }

    /// Add a detached box-model view.
    pub fn add_plain(
        &mut self,
        name: impl Into<String>,
        measure: impl Measure + 'static,
    ) -> ViewId {
        self.insert(name, ViewKind::Plain(Box::new(measure)))
    }

    /// Add a detached fixed-height spacer.
    pub(crate) fn add_spacer(&mut self, height: f32) -> ViewId {
        self.insert("spacer", ViewKind::Spacer(height.max(0.0)))
    }

    /// Add a detached scroll surface.
    pub fn add_scroll_surface(
        &mut self,
        name: impl Into<String>,
        surface: ScrollSurface,
    ) -> TypedId<ScrollSurface> {
        TypedId::new(self.insert(name, ViewKind::Surface(surface)))
    }

    /// Add a detached web-content view together with its internal surface.
    pub fn add_web_content(
        &mut self,
        name: impl Into<String>,
        surface: ScrollSurface,
    ) -> WebContentView {
        let name = name.into();
        let inner = self.insert(format!("{name}.surface"), ViewKind::Surface(surface));
        let view = self.insert(name, ViewKind::WebContent { surface: inner });
        self.link(view, inner);
        WebContentView {
            view,
            surface: TypedId::new(inner),
        }
    }

    /// Link a freshly created, detached child under a parent. Unlike
    /// `attach`, this cannot fail for ids just returned by `insert`.
    pub(crate) fn link(&mut self, parent: ViewId, child: ViewId) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
            node.needs_layout = true;
        }
    }

    /// Add a detached composite view. Its children fill its bounds.
    pub fn add_composite(&mut self, name: impl Into<String>) -> ViewId {
        self.insert(name, ViewKind::Composite)
    }

    /// Add a detached stack content view.
    pub(crate) fn add_stack(&mut self, name: impl Into<String>, margins: Insets) -> ViewId {
        let id = self.insert(name, ViewKind::Stack);
        if let Some(node) = self.nodes.get_mut(id) {
            node.layout_margins = margins;
        }
        id
    }

    /// Add a detached wrapper node.
    pub(crate) fn add_wrapper(&mut self, wrapper: SizeObservingWrapper) -> ViewId {
        self.insert("wrapper", ViewKind::Wrapper(wrapper))
    }

    /// True if the id resolves to a live view.
    pub fn contains(&self, id: impl Into<ViewId>) -> bool {
        self.nodes.contains_key(id.into())
    }

    /// Return a reference to a node by id.
    pub fn node(&self, id: impl Into<ViewId>) -> Option<&Node> {
        self.nodes.get(id.into())
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no views.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return a node or a `NodeNotFound` error.
    fn get(&self, id: ViewId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Return a mutable node or a `NodeNotFound` error.
    fn get_mut(&mut self, id: ViewId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Parent of a view, if it has one.
    pub fn parent_of(&self, id: impl Into<ViewId>) -> Option<ViewId> {
        self.nodes.get(id.into()).and_then(|n| n.parent)
    }

    /// Children of a view; empty if the view does not exist.
    pub fn children_of(&self, id: impl Into<ViewId>) -> &[ViewId] {
        self.nodes
            .get(id.into())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// True if `ancestor` is a proper ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: ViewId, id: ViewId) -> bool {
        let mut cur = self.parent_of(id);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.parent_of(p);
        }
        false
    }

    /// Attach a detached child as the last child of `parent`.
    pub fn attach(&mut self, parent: impl Into<ViewId>, child: impl Into<ViewId>) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        self.get(parent)?;
        if self.get(child)?.parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        self.get_mut(child)?.parent = Some(parent);
        let node = self.get_mut(parent)?;
        node.children.push(child);
        node.needs_layout = true;
        Ok(())
    }

    /// Detach a child from its parent if attached.
    ///
    /// The parent's structural removal hook runs before the detachment
    /// completes. Removing the presentable view from a size-observing wrapper
    /// releases the wrapper's subscription and then removes the wrapper
    /// itself from its parent and from the arena.
    pub fn detach(&mut self, child: impl Into<ViewId>) -> Result<()> {
        let child = child.into();
        let Some(parent) = self.get(child)?.parent else {
            return Ok(());
        };
        let orphaned = self.will_remove_subview(parent, child);

        let node = self.get_mut(parent)?;
        node.children.retain(|id| *id != child);
        node.needs_layout = true;
        self.get_mut(child)?.parent = None;

        if let Some(wrapper) = orphaned {
            self.discard_wrapper(wrapper)?;
        }
        Ok(())
    }

    /// Structural removal hook: `child` is about to be detached from `parent`.
    ///
    /// Returns a wrapper that must be discarded once the detachment is done.
    fn will_remove_subview(&mut self, parent: ViewId, child: ViewId) -> Option<ViewId> {
        let token = match self.nodes.get_mut(parent).map(|n| &mut n.kind) {
            Some(ViewKind::Wrapper(w)) if w.adapter().presentable_view() == child => {
                w.take_subscription()
            }
            _ => return None,
        };
        tracing::debug!(wrapper = ?parent, presentable = ?child, "wrapped view removed");
        if let Some(token) = token {
            self.release(token);
        }
        Some(parent)
    }

    /// Remove an emptied wrapper from its parent and from the arena.
    fn discard_wrapper(&mut self, wrapper: ViewId) -> Result<()> {
        self.detach(wrapper)?;
        let children = self.get(wrapper)?.children.clone();
        for child in children {
            self.detach(child)?;
        }
        self.nodes.remove(wrapper);
        tracing::debug!(?wrapper, "wrapper discarded");
        Ok(())
    }

    /// Remove a view and all its descendants from the arena.
    ///
    /// Subscriptions held by wrappers in the subtree, or observing surfaces in
    /// the subtree, are released.
    pub fn remove_subtree(&mut self, root: impl Into<ViewId>) -> Result<()> {
        let root = root.into();
        self.detach(root)?;

        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children.iter().copied());
        }

        for id in &order {
            let token = match self.nodes.get_mut(*id).map(|n| &mut n.kind) {
                Some(ViewKind::Wrapper(w)) => w.take_subscription(),
                _ => None,
            };
            if let Some(token) = token {
                self.release(token);
            }
            if let Some(sub) = self.observers.observing(*id)
                && let Some(owner) = self.observers.owner(sub)
            {
                // An observed surface is going away under a wrapper that
                // survives; leave the wrapper inert.
                let token = match self.nodes.get_mut(owner).map(|n| &mut n.kind) {
                    Some(ViewKind::Wrapper(w)) => w.take_subscription(),
                    _ => None,
                };
                if let Some(token) = token {
                    self.release(token);
                }
            }
        }
        for id in order.iter().rev() {
            self.nodes.remove(*id);
        }
        tracing::trace!(?root, count = order.len(), "subtree removed");
        Ok(())
    }

    /// Frame of a view relative to its parent.
    pub fn frame(&self, id: impl Into<ViewId>) -> Option<Rect> {
        self.nodes.get(id.into()).map(|n| n.frame)
    }

    /// Set a view's frame. A size change marks the view for layout.
    pub fn set_frame(&mut self, id: impl Into<ViewId>, frame: Rect) -> Result<()> {
        let node = self.get_mut(id.into())?;
        if node.frame.size != frame.size {
            node.needs_layout = true;
        }
        node.frame = frame;
        Ok(())
    }

    /// Set the margin guide of a view.
    pub fn set_layout_margins(&mut self, id: impl Into<ViewId>, margins: Insets) -> Result<()> {
        let node = self.get_mut(id.into())?;
        node.layout_margins = margins;
        node.needs_layout = true;
        Ok(())
    }

    /// True if the view has pending layout.
    pub fn needs_layout(&self, id: impl Into<ViewId>) -> bool {
        self.nodes.get(id.into()).is_some_and(|n| n.needs_layout)
    }

    /// Mark a view for layout. Returns false if the view is gone.
    pub fn set_needs_layout(&mut self, id: impl Into<ViewId>) -> bool {
        match self.nodes.get_mut(id.into()) {
            Some(node) => {
                node.needs_layout = true;
                true
            }
            None => false,
        }
    }

    /// Clear the pending-layout flag of one view.
    pub(crate) fn clear_needs_layout(&mut self, id: ViewId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.needs_layout = false;
        }
    }

    /// Synchronously complete pending layout in the subtree rooted at `id`.
    ///
    /// Wrappers, web-content and composite views pin their children to
    /// their bounds; scroll surfaces with self-laying-out content recompute
    /// their content size. Stack content views and everything below them are
    /// skipped: the owning container positions their children, and a
    /// surface that lays out marks its stack content pending for it.
    pub fn layout_if_needed(&mut self, id: impl Into<ViewId>) -> Result<()> {
        let id = id.into();
        self.get(id)?;
        let mut stack = vec![id];
        while let Some(v) = stack.pop() {
            let Some(node) = self.nodes.get(v) else {
                continue;
            };
            if matches!(node.kind, ViewKind::Stack) {
                continue;
            }
            if node.needs_layout {
                self.layout_node(v)?;
            }
            stack.extend(self.children_of(v).iter().rev().copied());
        }
        Ok(())
    }

    /// Lay out one node's direct children.
    fn layout_node(&mut self, id: ViewId) -> Result<()> {
        let node = self.get_mut(id)?;
        node.needs_layout = false;
        let bounds = node.frame.bounds();
        match node.kind {
            ViewKind::Wrapper(_) | ViewKind::WebContent { .. } | ViewKind::Composite => {
                let children = node.children.clone();
                for child in children {
                    self.set_frame(child, bounds)?;
                }
            }
            ViewKind::Surface(_) => {
                let children = node.children.clone();
                self.reflow_surface(id)?;
                for child in children {
                    if let Some(n) = self.nodes.get_mut(child)
                        && matches!(n.kind, ViewKind::Stack)
                    {
                        n.needs_layout = true;
                    }
                }
            }
            ViewKind::Plain(_) | ViewKind::Spacer(_) | ViewKind::Stack => {}
        }
        Ok(())
    }

    /// Recompute a surface's content size from its content, if it has any.
    fn reflow_surface(&mut self, id: ViewId) -> Result<()> {
        let node = self.get_mut(id)?;
        let bounds = node.frame.size;
        let ViewKind::Surface(surface) = &mut node.kind else {
            return Err(Error::NotAScrollSurface(id));
        };
        let Some(content) = surface.content.as_mut() else {
            return Ok(());
        };
        let size = content.content_size(bounds);
        self.set_content_size(id, size)
    }

    /// Intrinsic size of a box-model view at a given width.
    pub fn measure(&self, id: impl Into<ViewId>, width: f32) -> Result<Size> {
        let node = self.get(id.into())?;
        Ok(match &node.kind {
            ViewKind::Plain(m) => m.measure(width),
            ViewKind::Spacer(h) => Size::new(width, *h),
            _ => node.frame.size,
        })
    }

    /// Scroll surface state of a view.
    pub fn surface(&self, id: impl Into<ViewId>) -> Option<&ScrollSurface> {
        self.nodes.get(id.into()).and_then(|n| n.surface())
    }

    /// Mutable scroll surface state, or `NotAScrollSurface`.
    fn surface_mut(&mut self, id: ViewId) -> Result<&mut ScrollSurface> {
        match &mut self.get_mut(id)?.kind {
            ViewKind::Surface(s) => Ok(s),
            _ => Err(Error::NotAScrollSurface(id)),
        }
    }

    /// Set a surface's content size, notifying its observer if it changed.
    pub fn set_content_size(&mut self, surface: impl Into<ViewId>, size: Size) -> Result<()> {
        let id = surface.into();
        let s = self.surface_mut(id)?;
        let old = s.content_size;
        if old == size {
            return Ok(());
        }
        s.content_size = size;
        let Some(subscription) = self.observers.observing(id) else {
            return Ok(());
        };
        tracing::trace!(surface = ?id, ?old, new = ?size, "content size changed");
        // At most one queued change per subscription, spanning every update
        // since the owner last drained.
        if let Some(queued) = self
            .notifications
            .iter_mut()
            .find(|c| c.subscription == subscription)
        {
            queued.new = size;
        } else {
            self.notifications.push_back(ContentSizeChange {
                subscription,
                surface: id,
                old,
                new: size,
            });
        }
        Ok(())
    }

    /// Set a surface's content insets.
    ///
    /// Only content size changes are observed; callers that change insets on
    /// an observed surface should follow up with a content size update.
    pub fn set_content_insets(&mut self, surface: impl Into<ViewId>, insets: Insets) -> Result<()> {
        self.surface_mut(surface.into())?.content_insets = insets;
        Ok(())
    }

    /// Replace a surface's self-laying-out content and reflow it at the
    /// surface's current bounds.
    pub fn set_surface_content(
        &mut self,
        surface: impl Into<ViewId>,
        content: Box<dyn SurfaceContent>,
    ) -> Result<()> {
        let id = surface.into();
        self.surface_mut(id)?.content = Some(content);
        self.reflow_surface(id)
    }

    /// Enable or disable user scrolling on a surface.
    ///
    /// An observed surface belongs to the outer container's scroll authority
    /// and cannot be re-enabled while the observation lasts.
    pub fn set_user_scroll_enabled(
        &mut self,
        surface: impl Into<ViewId>,
        enabled: bool,
    ) -> Result<()> {
        let id = surface.into();
        if enabled && self.observers.observing(id).is_some() {
            return Err(Error::ScrollAuthority(id));
        }
        self.surface_mut(id)?.user_scroll_enabled = enabled;
        Ok(())
    }

    /// Set a surface's scroll offset, clamped to its scrollable range.
    pub fn set_content_offset(&mut self, surface: impl Into<ViewId>, offset: Point) -> Result<()> {
        let id = surface.into();
        let viewport = self.get(id)?.frame.size.h;
        let s = self.surface_mut(id)?;
        let max = s.inset_content_height() - viewport;
        s.content_offset = offset.clamp_y(max);
        Ok(())
    }

    /// Wrapper state of a view.
    pub fn wrapper(&self, id: impl Into<ViewId>) -> Option<&SizeObservingWrapper> {
        self.nodes.get(id.into()).and_then(|n| n.wrapper())
    }

    /// Mutable wrapper state of a view.
    pub(crate) fn wrapper_mut(&mut self, id: ViewId) -> Option<&mut SizeObservingWrapper> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(ViewKind::Wrapper(w)) => Some(w),
            _ => None,
        }
    }

    /// Live subscriptions.
    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    /// Subscribe `owner` to content-size changes of `surface`.
    pub(crate) fn subscribe(&mut self, surface: ViewId, owner: ViewId) -> Result<Subscription> {
        if self.surface(surface).is_none() {
            return Err(Error::NotAScrollSurface(surface));
        }
        self.observers.subscribe(surface, owner)
    }

    /// Release a subscription and drop its queued notifications.
    pub(crate) fn release(&mut self, token: Subscription) {
        let id = token.id();
        self.observers.release(token);
        self.notifications.retain(|c| c.subscription != id);
    }

    /// Number of queued notifications.
    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    /// Remove and return queued notifications selected by `take`, oldest
    /// first. Unselected notifications stay queued for their own owner.
    pub fn drain_notifications(
        &mut self,
        mut take: impl FnMut(&ContentSizeChange) -> bool,
    ) -> Vec<ContentSizeChange> {
        let mut out = Vec::new();
        self.notifications.retain(|c| {
            if take(c) {
                out.push(*c);
                false
            } else {
                true
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapter::ScrollableContent, core::node::Fixed};

    #[test]
    fn attach_rejects_cycles_and_reparenting() -> Result<()> {
        let mut core = Core::new();
        let a = core.add_composite("a");
        let b = core.add_composite("b");
        let c = core.add_composite("c");
        core.attach(a, b)?;
        assert_eq!(core.attach(b, a), Err(Error::WouldCreateCycle { parent: b, child: a }));
        assert_eq!(core.attach(c, b), Err(Error::AlreadyAttached(b)));
        assert_eq!(core.attach(a, a), Err(Error::WouldCreateCycle { parent: a, child: a }));
        Ok(())
    }

    #[test]
    fn composite_pins_children() -> Result<()> {
        let mut core = Core::new();
        let parent = core.add_composite("parent");
        let child = core.add_plain("child", Fixed(Size::new(1.0, 1.0)));
        core.attach(parent, child)?;
        core.set_frame(parent, Rect::new(5.0, 5.0, 100.0, 40.0))?;
        core.layout_if_needed(parent)?;
        assert_eq!(core.frame(child), Some(Rect::new(0.0, 0.0, 100.0, 40.0)));
        assert!(!core.needs_layout(parent));
        Ok(())
    }

    #[test]
    fn content_size_notifies_only_observed_surfaces() -> Result<()> {
        let mut core = Core::new();
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        core.set_content_size(s, Size::new(10.0, 10.0))?;
        assert_eq!(core.pending_notifications(), 0);

        let owner = core.add_composite("owner");
        let token = core.subscribe(s.id(), owner)?;
        core.set_content_size(s, Size::new(10.0, 10.0))?;
        assert_eq!(core.pending_notifications(), 0);
        core.set_content_size(s, Size::new(10.0, 30.0))?;
        let changes = core.drain_notifications(|_| true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old, Size::new(10.0, 10.0));
        assert_eq!(changes[0].new, Size::new(10.0, 30.0));

        core.set_content_size(s, Size::new(10.0, 50.0))?;
        core.release(token);
        assert_eq!(core.pending_notifications(), 0);
        Ok(())
    }

    #[test]
    fn undrained_changes_merge_per_subscription() -> Result<()> {
        let mut core = Core::new();
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        let owner = core.add_composite("owner");
        let token = core.subscribe(s.id(), owner)?;
        for h in 1..=1000 {
            core.set_content_size(s, Size::new(10.0, h as f32))?;
        }
        assert_eq!(core.pending_notifications(), 1);
        let changes = core.drain_notifications(|_| true);
        assert_eq!(changes[0].old, Size::zero());
        assert_eq!(changes[0].new, Size::new(10.0, 1000.0));
        core.release(token);
        Ok(())
    }

    #[test]
    fn observed_surface_cannot_reenable_scrolling() -> Result<()> {
        let mut core = Core::new();
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        let owner = core.add_composite("owner");
        let token = core.subscribe(s.id(), owner)?;
        assert_eq!(
            core.set_user_scroll_enabled(s, true),
            Err(Error::ScrollAuthority(s.id()))
        );
        core.release(token);
        core.set_user_scroll_enabled(s, true)?;
        Ok(())
    }

    #[test]
    fn detaching_presentable_discards_wrapper() -> Result<()> {
        let mut core = Core::new();
        let parent = core.add_composite("parent");
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        let wrapper =
            SizeObservingWrapper::attach(&mut core, ScrollableContent::from_scroll_surface(s))?;
        core.attach(parent, wrapper)?;
        assert_eq!(core.observers().len(), 1);

        core.detach(s)?;
        assert!(!core.contains(wrapper));
        assert!(core.contains(s));
        assert_eq!(core.parent_of(s), None);
        assert!(core.children_of(parent).is_empty());
        assert!(core.observers().is_empty());
        Ok(())
    }

    #[test]
    fn removing_observed_surface_releases_subscription() -> Result<()> {
        let mut core = Core::new();
        let web = core.add_web_content("web", ScrollSurface::new());
        let wrapper =
            SizeObservingWrapper::attach(&mut core, ScrollableContent::from_web_content(web))?;
        core.remove_subtree(web.surface)?;
        assert!(core.observers().is_empty());
        assert!(core.contains(wrapper));
        assert!(core.wrapper(wrapper).is_some_and(|w| !w.is_observing()));
        Ok(())
    }

    #[test]
    fn surface_content_reflows_at_bounds() -> Result<()> {
        struct Half;
        impl SurfaceContent for Half {
            fn content_size(&mut self, bounds: Size) -> Size {
                Size::new(bounds.w, bounds.w / 2.0)
            }
        }
        let mut core = Core::new();
        let s = core.add_scroll_surface("s", ScrollSurface::new());
        core.set_frame(s, Rect::new(0.0, 0.0, 100.0, 10.0))?;
        core.set_surface_content(s, Box::new(Half))?;
        assert_eq!(core.surface(s).map(|s| s.content_size()), Some(Size::new(100.0, 50.0)));
        core.set_frame(s, Rect::new(0.0, 0.0, 60.0, 10.0))?;
        core.layout_if_needed(s)?;
        assert_eq!(core.surface(s).map(|s| s.content_size()), Some(Size::new(60.0, 30.0)));
        Ok(())
    }
}
