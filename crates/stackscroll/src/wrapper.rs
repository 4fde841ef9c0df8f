//! The transparent sizing box placed around one scrollable child.

use crate::{
    adapter::ScrollableContent,
    core::{
        Core,
        id::ViewId,
        observe::{ContentSizeChange, Subscription},
    },
    error::{Error, Result},
};

/// Natural size reported by a wrapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntrinsicSize {
    /// The surface's natural width, if it has one.
    pub width: Option<f32>,
    /// Content height plus vertical content insets, never negative.
    pub height: f32,
}

/// A sizing box around one scrollable child's presentable view.
///
/// The wrapper owns the content-size subscription for the child's scroll
/// surface, keeps that surface's own scrolling disabled, and reports the
/// surface's full content height as its intrinsic height, so the child is
/// expanded into the parent's flow instead of scrolling internally.
///
/// The wrapper lives in the arena as a node; it is torn down by the arena's
/// structural removal hook when its presentable view is detached.
#[derive(Debug)]
pub struct SizeObservingWrapper {
    /// The wrapped content.
    adapter: ScrollableContent,
    /// Live subscription to the surface's content size.
    subscription: Option<Subscription>,
    /// Height used by the last layout pass; `None` once invalidated.
    cached_height: Option<f32>,
}

impl SizeObservingWrapper {
    /// Wrap `adapter` in a new, detached wrapper node.
    ///
    /// Disables user scrolling on the adapter's surface, inserts the
    /// presentable view as the wrapper's sole child pinned to its edges, and
    /// subscribes to the surface's content-size changes.
    pub fn attach(core: &mut Core, adapter: ScrollableContent) -> Result<ViewId> {
        let surface = adapter.scroll_surface().id();
        let presentable = adapter.presentable_view();
        if core.surface(surface).is_none() {
            return Err(Error::NotAScrollSurface(surface));
        }
        if !core.contains(presentable) {
            return Err(Error::NodeNotFound(presentable));
        }
        if presentable != surface && !core.is_ancestor(presentable, surface) {
            return Err(Error::Internal(format!(
                "surface {surface:?} is not inside {presentable:?}"
            )));
        }
        if core.parent_of(presentable).is_some() {
            return Err(Error::AlreadyAttached(presentable));
        }
        if core.observers().observing(surface).is_some() {
            return Err(Error::AlreadyObserved(surface));
        }

        let wrapper = core.add_wrapper(Self {
            adapter,
            subscription: None,
            cached_height: None,
        });
        core.attach(wrapper, presentable)?;
        core.set_user_scroll_enabled(surface, false)?;
        let token = core.subscribe(surface, wrapper)?;
        match core.wrapper_mut(wrapper) {
            Some(w) => w.subscription = Some(token),
            None => {
                core.release(token);
                return Err(Error::NodeNotFound(wrapper));
            }
        }
        tracing::debug!(?wrapper, ?surface, ?presentable, "wrapper attached");
        Ok(wrapper)
    }

    /// The wrapped content.
    pub fn adapter(&self) -> ScrollableContent {
        self.adapter
    }

    /// The live subscription, if the wrapper is still observing.
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// True while the subscription is held.
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Give up the subscription token so it can be released.
    pub(crate) fn take_subscription(&mut self) -> Option<Subscription> {
        self.cached_height = None;
        self.subscription.take()
    }

    /// Decide whether a content-size notification should invalidate this
    /// wrapper's intrinsic size.
    ///
    /// Notifications for other subscriptions, and changes that leave the
    /// height untouched, are ignored.
    pub fn should_invalidate(&self, change: &ContentSizeChange) -> bool {
        let Some(sub) = self.subscription.as_ref() else {
            return false;
        };
        if !sub.matches(change) {
            tracing::trace!(?change, "notification for another subscription");
            return false;
        }
        change.height_changed()
    }

    /// Drop the cached height so the next layout pass re-queries it.
    pub(crate) fn invalidate_intrinsic_size(&mut self) {
        self.cached_height = None;
    }

    /// True if the next layout pass will re-query the intrinsic size.
    pub fn is_invalidated(&self) -> bool {
        self.cached_height.is_none()
    }

    /// The height the last layout pass used, if still valid.
    pub fn cached_height(&self) -> Option<f32> {
        self.cached_height
    }

    /// Query the wrapper's intrinsic size.
    ///
    /// Pending layout inside the wrapper is completed first, so the surface's
    /// content size reflects the latest content state.
    pub fn intrinsic_size(core: &mut Core, wrapper: ViewId) -> Result<IntrinsicSize> {
        let adapter = core
            .wrapper(wrapper)
            .ok_or(Error::NodeNotFound(wrapper))?
            .adapter;
        core.layout_if_needed(wrapper)?;
        let surface_id = adapter.scroll_surface().id();
        let surface = core
            .surface(surface_id)
            .ok_or(Error::NotAScrollSurface(surface_id))?;
        Ok(IntrinsicSize {
            width: surface.intrinsic_width(),
            height: surface.inset_content_height(),
        })
    }

    /// Height for a layout pass: the cached height, or a fresh intrinsic
    /// size query if it was invalidated.
    pub(crate) fn height_for_layout(core: &mut Core, wrapper: ViewId) -> Result<f32> {
        if let Some(h) = core.wrapper(wrapper).and_then(|w| w.cached_height) {
            return Ok(h);
        }
        let size = Self::intrinsic_size(core, wrapper)?;
        if let Some(w) = core.wrapper_mut(wrapper) {
            w.cached_height = Some(size.height);
        }
        Ok(size.height)
    }
}
