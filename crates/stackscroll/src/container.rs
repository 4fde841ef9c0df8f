//! The stacking container: one outer scroll surface holding a vertical chain
//! of managed child views.

use std::{collections::HashSet, mem, time::Instant};

use tracing::{debug, trace, warn};

use crate::{
    adapter::ScrollableContent,
    config::ContainerConfig,
    core::{
        Core,
        id::{TypedId, ViewId},
        node::ScrollSurface,
        observe::SubscriptionId,
        scheduler::Debouncer,
    },
    error::{Error, Result},
    geom::{Insets, Point, Rect, Size},
    wrapper::SizeObservingWrapper,
};

/// Horizontal placement of a managed view inside the container's content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalInset {
    /// A fixed margin applied to both the left and right edges.
    Custom(f32),
    /// Follow the content view's margin guide.
    EdgeMargin,
}

impl Default for HorizontalInset {
    fn default() -> Self {
        Self::Custom(0.0)
    }
}

impl HorizontalInset {
    /// Resolve to an `(x, width)` pair inside a content view of `width`.
    pub fn resolve(&self, width: f32, margins: Insets) -> (f32, f32) {
        let (left, right) = match self {
            Self::Custom(m) => (*m, *m),
            Self::EdgeMargin => (margins.left, margins.right),
        };
        (left, (width - left - right).max(0.0))
    }
}

/// What a managed view's top edge is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// The top of the container's content.
    ContainerTop,
    /// The bottom of the previous entry's root view.
    BottomOf(ViewId),
}

/// The node a managed entry places into the content view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryKind {
    /// A box-model view, placed directly.
    Plain(ViewId),
    /// A scrollable view, placed inside a size-observing wrapper.
    ScrollWrapped {
        /// The wrapper node.
        wrapper: ViewId,
        /// The wrapped content.
        adapter: ScrollableContent,
    },
}

/// One managed child in the container's vertical chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagedEntry {
    /// The placed node.
    kind: EntryKind,
    /// Horizontal placement.
    inset: HorizontalInset,
    /// Spacer placed above the entry, if it asked for top space.
    spacer: Option<ViewId>,
    /// Height of the spacer.
    top_space: f32,
    /// Top anchor, maintained by `rechain`.
    top: Anchor,
}

impl ManagedEntry {
    /// The placed node.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Horizontal placement.
    pub fn inset(&self) -> HorizontalInset {
        self.inset
    }

    /// Extra space above the entry.
    pub fn top_space(&self) -> f32 {
        self.top_space
    }

    /// Spacer node above the entry, if any.
    pub fn spacer(&self) -> Option<ViewId> {
        self.spacer
    }

    /// What the entry's top edge is pinned to.
    pub fn top_anchor(&self) -> Anchor {
        self.top
    }

    /// The view the caller handed in: the plain view, or the presentable view
    /// of scrollable content.
    pub fn view(&self) -> ViewId {
        match self.kind {
            EntryKind::Plain(v) => v,
            EntryKind::ScrollWrapped { adapter, .. } => adapter.presentable_view(),
        }
    }

    /// The node that sits directly in the content view: the plain view or the
    /// wrapper.
    pub fn root(&self) -> ViewId {
        match self.kind {
            EntryKind::Plain(v) => v,
            EntryKind::ScrollWrapped { wrapper, .. } => wrapper,
        }
    }

    /// The wrapper node, for scrollable entries.
    pub fn wrapper(&self) -> Option<ViewId> {
        match self.kind {
            EntryKind::Plain(_) => None,
            EntryKind::ScrollWrapped { wrapper, .. } => Some(wrapper),
        }
    }
}

/// What a caller asks the container to manage.
#[derive(Debug, Clone, Copy)]
enum Source {
    /// A box-model view.
    Plain(ViewId),
    /// Scrollable content.
    Scrollable(ScrollableContent),
}

/// A settle action: invalidate one wrapper and request a container layout.
/// Returns false if the wrapper or the container was already gone.
type SettleAction = Box<dyn FnOnce(&mut Core) -> bool + Send>;

/// Counters from one [`StackingContainer::pump`] pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpReport {
    /// Notifications drained for this container's wrappers.
    pub notifications: usize,
    /// Settle actions newly scheduled.
    pub scheduled: usize,
    /// Notifications absorbed by an already pending settle.
    pub coalesced: usize,
    /// Settle actions that ran against a live wrapper.
    pub fired: usize,
    /// Whether a layout pass ran.
    pub laid_out: bool,
}

/// A vertical stack of heterogeneous views inside one scroll surface.
///
/// Plain views are placed at their intrinsic height. Scrollable views are
/// wrapped so that their own scrolling is disabled and their full content
/// height is laid out inline; the container's root surface is the only
/// scroll authority. Each entry's top is pinned to the bottom of the entry
/// before it, or to the top of the content for the first entry.
///
/// Content-size changes of wrapped surfaces are debounced per wrapper and
/// applied by [`pump`](Self::pump). The container owns no views directly:
/// every node lives in the [`Core`] arena and is addressed by id.
pub struct StackingContainer {
    /// The outer scroll surface.
    root: TypedId<ScrollSurface>,
    /// The content view holding the chain.
    content: ViewId,
    /// Managed entries in display order.
    entries: Vec<ManagedEntry>,
    /// Root of the last entry, if any.
    bottom: Option<ViewId>,
    /// Pending settle actions, one per wrapper.
    scheduler: Debouncer<ViewId, SettleAction>,
    /// Tunables.
    config: ContainerConfig,
}

impl StackingContainer {
    /// Create a container with the default configuration.
    pub fn new(core: &mut Core) -> Self {
        Self::with_config(core, ContainerConfig::default())
    }

    /// Create a container. Its root surface starts detached; attach it to a
    /// parent or drive it directly with [`set_frame`](Self::set_frame).
    pub fn with_config(core: &mut Core, config: ContainerConfig) -> Self {
        let root = core.add_scroll_surface("stacking-container", ScrollSurface::new());
        let content = core.add_stack("stacking-content", config.layout_margins);
        core.link(root.id(), content);
        debug!(root = ?root, ?content, "container created");
        Self {
            root,
            content,
            entries: Vec::new(),
            bottom: None,
            scheduler: Debouncer::new(config.settle_delay()),
            config,
        }
    }

    /// The outer scroll surface.
    pub fn root(&self) -> TypedId<ScrollSurface> {
        self.root
    }

    /// The content view holding the chain.
    pub fn content(&self) -> ViewId {
        self.content
    }

    /// The configuration the container was built with.
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Number of managed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is managed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Managed entries in display order.
    pub fn entries(&self) -> &[ManagedEntry] {
        &self.entries
    }

    /// The managed views in display order: plain views, and the presentable
    /// view of each scrollable entry.
    pub fn managed_subviews(&self) -> Vec<ViewId> {
        self.entries.iter().map(ManagedEntry::view).collect()
    }

    /// Root node of the last entry, which the next appended entry will be
    /// pinned below.
    pub fn bottom_anchor(&self) -> Option<ViewId> {
        self.bottom
    }

    /// Number of wrappers with a pending settle.
    pub fn pending_settles(&self) -> usize {
        self.scheduler.len()
    }

    /// When the earliest pending settle is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Set the frame of the root surface.
    pub fn set_frame(&self, core: &mut Core, frame: Rect) -> Result<()> {
        core.set_frame(self.root, frame)?;
        core.set_needs_layout(self.content);
        Ok(())
    }

    /// Current scroll offset of the root surface.
    pub fn content_offset(&self, core: &Core) -> Point {
        core.surface(self.root)
            .map(ScrollSurface::content_offset)
            .unwrap_or_default()
    }

    /// Scroll the root surface so that `y` is at the top of the viewport,
    /// clamped to the scrollable range.
    pub fn scroll_to(&self, core: &mut Core, y: f32) -> Result<()> {
        core.set_content_offset(self.root, Point::new(0.0, y))
    }

    /// Append a box-model view.
    pub fn add_simple_view(
        &mut self,
        core: &mut Core,
        view: ViewId,
        inset: HorizontalInset,
    ) -> Result<()> {
        self.insert_entry(core, Source::Plain(view), inset, 0.0, self.len())
    }

    /// Append a box-model view with extra space above it.
    pub fn add_simple_view_with_top_space(
        &mut self,
        core: &mut Core,
        view: ViewId,
        inset: HorizontalInset,
        top_space: f32,
    ) -> Result<()> {
        self.insert_entry(core, Source::Plain(view), inset, top_space, self.len())
    }

    /// Append scrollable content, wrapped so that it lays out at its full
    /// content height.
    pub fn add_scrollable_view(
        &mut self,
        core: &mut Core,
        content: ScrollableContent,
        inset: HorizontalInset,
    ) -> Result<()> {
        self.insert_entry(core, Source::Scrollable(content), inset, 0.0, self.len())
    }

    /// Append scrollable content with extra space above it.
    pub fn add_scrollable_view_with_top_space(
        &mut self,
        core: &mut Core,
        content: ScrollableContent,
        inset: HorizontalInset,
        top_space: f32,
    ) -> Result<()> {
        let index = self.len();
        self.insert_entry(core, Source::Scrollable(content), inset, top_space, index)
    }

    /// Insert a box-model view at `index`, which may equal the current
    /// count to append.
    pub fn insert_simple_view(
        &mut self,
        core: &mut Core,
        view: ViewId,
        inset: HorizontalInset,
        index: usize,
    ) -> Result<()> {
        self.insert_entry(core, Source::Plain(view), inset, 0.0, index)
    }

    /// Insert scrollable content at `index`, which may equal the current
    /// count to append.
    pub fn insert_scrollable_view(
        &mut self,
        core: &mut Core,
        content: ScrollableContent,
        inset: HorizontalInset,
        index: usize,
    ) -> Result<()> {
        self.insert_entry(core, Source::Scrollable(content), inset, 0.0, index)
    }

    /// Shared insertion path. The index is checked before anything is
    /// created, so a rejected insert leaves both the chain and the arena
    /// untouched.
    fn insert_entry(
        &mut self,
        core: &mut Core,
        source: Source,
        inset: HorizontalInset,
        top_space: f32,
        index: usize,
    ) -> Result<()> {
        let len = self.entries.len();
        if index > len {
            warn!(index, len, "insert index out of range, ignored");
            return Err(Error::IndexOutOfRange { index, len });
        }
        if !top_space.is_finite() || top_space < 0.0 {
            return Err(Error::Geometry(format!("top space {top_space} is invalid")));
        }

        let kind = match source {
            Source::Plain(view) => {
                core.attach(self.content, view)?;
                EntryKind::Plain(view)
            }
            Source::Scrollable(adapter) => {
                let wrapper = SizeObservingWrapper::attach(core, adapter)?;
                core.link(self.content, wrapper);
                EntryKind::ScrollWrapped { wrapper, adapter }
            }
        };
        let spacer = (top_space > 0.0).then(|| {
            let spacer = core.add_spacer(top_space);
            core.link(self.content, spacer);
            spacer
        });

        self.entries.insert(
            index,
            ManagedEntry {
                kind,
                inset,
                spacer,
                top_space,
                top: Anchor::ContainerTop,
            },
        );
        self.rechain();
        core.set_needs_layout(self.root);
        debug!(index, ?kind, top_space, "entry inserted");
        Ok(())
    }

    /// Re-pin every entry below its predecessor and update the bottom
    /// anchor.
    fn rechain(&mut self) {
        let mut prev = None;
        for entry in &mut self.entries {
            entry.top = match prev {
                None => Anchor::ContainerTop,
                Some(v) => Anchor::BottomOf(v),
            };
            prev = Some(entry.root());
        }
        self.bottom = prev;
        trace!(len = self.entries.len(), bottom = ?self.bottom, "rechained");
    }

    /// Remove one managed view. Scrollable content is detached from its
    /// wrapper, which tears the wrapper down; the view itself survives in
    /// the arena, detached.
    pub fn remove_managed_subview(&mut self, core: &mut Core, view: ViewId) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.view() == view)
            .ok_or(Error::NotManaged(view))?;
        let entry = self.entries.remove(index);
        self.rechain();
        core.set_needs_layout(self.root);
        self.teardown_entry(core, &entry)?;
        debug!(index, ?view, "entry removed");
        Ok(())
    }

    /// Move the entry at `from` so that it ends up at index `to`.
    pub fn move_managed_subview(&mut self, core: &mut Core, from: usize, to: usize) -> Result<()> {
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                warn!(index, len, "move index out of range, ignored");
                return Err(Error::IndexOutOfRange { index, len });
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.rechain();
        core.set_needs_layout(self.root);
        debug!(from, to, "entry moved");
        Ok(())
    }

    /// Remove every managed view, leaving an empty chain.
    ///
    /// Pending settles for the removed wrappers are cancelled, and any that
    /// were already collected find their wrapper gone and do nothing.
    pub fn remove_all_managed_subviews(&mut self, core: &mut Core) -> Result<()> {
        let entries = mem::take(&mut self.entries);
        self.rechain();
        core.set_needs_layout(self.root);
        for entry in &entries {
            self.teardown_entry(core, entry)?;
        }
        debug!(count = entries.len(), "all entries removed");
        Ok(())
    }

    /// Tear down the container: remove every entry and then the root
    /// surface itself.
    pub fn destroy(mut self, core: &mut Core) -> Result<()> {
        self.remove_all_managed_subviews(core)?;
        self.scheduler.cancel();
        core.remove_subtree(self.root)?;
        debug!(root = ?self.root, "container destroyed");
        Ok(())
    }

    /// Undo one entry's placement in the arena.
    fn teardown_entry(&mut self, core: &mut Core, entry: &ManagedEntry) -> Result<()> {
        if let Some(spacer) = entry.spacer
            && core.contains(spacer)
        {
            core.remove_subtree(spacer)?;
        }
        match entry.kind {
            EntryKind::Plain(view) => {
                if core.parent_of(view) == Some(self.content) {
                    core.detach(view)?;
                }
            }
            EntryKind::ScrollWrapped { wrapper, adapter } => {
                self.scheduler.cancel_tag(wrapper);
                if core.contains(wrapper) {
                    let presentable = adapter.presentable_view();
                    if core.parent_of(presentable) == Some(wrapper) {
                        // The removal hook discards the wrapper.
                        core.detach(presentable)?;
                    } else {
                        core.remove_subtree(wrapper)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// True if an entry is still placed the way the container put it.
    fn is_live(&self, core: &Core, entry: &ManagedEntry) -> bool {
        match entry.kind {
            EntryKind::Plain(view) => core.parent_of(view) == Some(self.content),
            EntryKind::ScrollWrapped { wrapper, adapter } => {
                core.parent_of(wrapper) == Some(self.content)
                    && core.parent_of(adapter.presentable_view()) == Some(wrapper)
                    && core.wrapper(wrapper).is_some_and(SizeObservingWrapper::is_observing)
            }
        }
    }

    /// Drop entries whose views were removed or reparented behind the
    /// container's back, and clean up what they left behind. Returns the
    /// number of entries dropped.
    pub fn reap(&mut self, core: &mut Core) -> Result<usize> {
        let (live, dead): (Vec<_>, Vec<_>) = mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| self.is_live(core, e));
        self.entries = live;
        if dead.is_empty() {
            return Ok(0);
        }
        self.rechain();
        core.set_needs_layout(self.root);
        for entry in &dead {
            debug!(view = ?entry.view(), "reaping stale entry");
            self.teardown_entry(core, entry)?;
        }
        Ok(dead.len())
    }

    /// Subscriptions held by this container's wrappers.
    fn subscriptions(&self, core: &Core) -> HashSet<SubscriptionId> {
        self.entries
            .iter()
            .filter_map(ManagedEntry::wrapper)
            .filter_map(|w| core.wrapper(w))
            .filter_map(|w| w.subscription().map(|s| s.id()))
            .collect()
    }

    /// The deferred reaction to a wrapper's content height changing.
    fn settle_action(&self, wrapper: ViewId) -> SettleAction {
        let root = self.root.id();
        Box::new(move |core: &mut Core| {
            let Some(w) = core.wrapper_mut(wrapper) else {
                return false;
            };
            w.invalidate_intrinsic_size();
            core.set_needs_layout(root)
        })
    }

    /// Run one turn of the container's event handling at time `now`.
    ///
    /// Drains queued content-size notifications for this container's
    /// wrappers, schedules a debounced settle for each wrapper whose height
    /// changed, runs the settles that are due, and lays out if anything is
    /// pending.
    pub fn pump(&mut self, core: &mut Core, now: Instant) -> Result<PumpReport> {
        let mut report = PumpReport::default();
        self.reap(core)?;

        let mine = self.subscriptions(core);
        for change in core.drain_notifications(|c| mine.contains(&c.subscription)) {
            report.notifications += 1;
            let Some(owner) = core.observers().owner(change.subscription) else {
                continue;
            };
            if !core.wrapper(owner).is_some_and(|w| w.should_invalidate(&change)) {
                trace!(wrapper = ?owner, "height unchanged");
                continue;
            }
            let action = self.settle_action(owner);
            if self.scheduler.schedule_at(now, owner, action) {
                report.scheduled += 1;
            } else {
                report.coalesced += 1;
            }
        }

        for (wrapper, action) in self.scheduler.take_due(now) {
            if action(core) {
                report.fired += 1;
                debug!(?wrapper, "content size settled");
            } else {
                trace!(?wrapper, "settle for a removed wrapper");
            }
        }

        if core.needs_layout(self.root) || core.needs_layout(self.content) {
            self.layout(core)?;
            report.laid_out = true;
        }
        Ok(report)
    }

    /// Lay out the chain if anything is pending.
    pub fn layout_if_needed(&mut self, core: &mut Core) -> Result<()> {
        if core.needs_layout(self.root) || core.needs_layout(self.content) {
            self.layout(core)?;
        }
        Ok(())
    }

    /// Lay out the chain unconditionally.
    ///
    /// Entries are placed top to bottom at their resolved horizontal inset.
    /// Plain views get their measured height, wrappers the cached or freshly
    /// queried intrinsic height. Unless the root is itself observed by a
    /// wrapper, the content view is at least as tall as the viewport. The
    /// root's content size and offset follow it.
    pub fn layout(&mut self, core: &mut Core) -> Result<()> {
        self.reap(core)?;
        let root = self.root.id();
        let viewport = core.frame(root).ok_or(Error::NodeNotFound(root))?.size;
        let margins = core
            .node(self.content)
            .map(|n| n.layout_margins())
            .ok_or(Error::NodeNotFound(self.content))?;
        let width = viewport.w;

        let mut bottom = 0.0_f32;
        for entry in &self.entries {
            let top = match entry.top {
                Anchor::ContainerTop => 0.0,
                Anchor::BottomOf(v) => core.frame(v).ok_or(Error::NodeNotFound(v))?.bottom(),
            };
            let (x, w) = entry.inset.resolve(width, margins);
            let mut y = top;
            if let Some(spacer) = entry.spacer {
                core.set_frame(spacer, Rect::new(x, y, w, entry.top_space))?;
                y += entry.top_space;
            }
            let h = match entry.kind {
                EntryKind::Plain(view) => core.measure(view, w)?.h,
                EntryKind::ScrollWrapped { wrapper, .. } => {
                    // Offer the new width before querying, so reflowing
                    // content sizes itself against it.
                    let current = core.frame(wrapper).map(|f| f.height()).unwrap_or(0.0);
                    core.set_frame(wrapper, Rect::new(x, y, w, current))?;
                    SizeObservingWrapper::height_for_layout(core, wrapper)?
                }
            };
            let h = h.max(0.0);
            core.set_frame(entry.root(), Rect::new(x, y, w, h))?;
            core.layout_if_needed(entry.root())?;
            bottom = y + h;
        }

        // A nested root takes its height from this chain, so only a
        // top-level root fills its viewport.
        let height = if core.observers().observing(root).is_some() {
            bottom
        } else {
            bottom.max(viewport.h)
        };
        core.set_frame(self.content, Rect::new(0.0, 0.0, width, height))?;
        core.clear_needs_layout(self.content);
        core.set_content_size(root, Size::new(width, height))?;
        let offset = self.content_offset(core);
        core.set_content_offset(root, offset)?;
        core.clear_needs_layout(root);
        trace!(entries = self.entries.len(), height, "container laid out");
        Ok(())
    }
}
