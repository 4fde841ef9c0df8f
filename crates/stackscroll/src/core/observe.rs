//! Typed content-size observation.
//!
//! A subscription ties exactly one observer to exactly one scroll surface and
//! is represented by a [`Subscription`] token. The token is the only way to
//! release the observation, and a released subscription id never resolves
//! again, so late notifications for it are recognisably stale.

use std::collections::HashMap;

use slotmap::{SlotMap, new_key_type};

use crate::{
    core::id::ViewId,
    error::{Error, Result},
    geom::Size,
};

new_key_type! {
    /// Identifier of a live content-size subscription.
    pub struct SubscriptionId;
}

/// Disposable token for a content-size subscription.
///
/// Not `Clone`: exactly one owner can release it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription token leaks the observation"]
pub struct Subscription {
    /// Registry key.
    id: SubscriptionId,
    /// The observed surface.
    surface: ViewId,
}

impl Subscription {
    /// Registry key of this subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The observed surface.
    pub fn surface(&self) -> ViewId {
        self.surface
    }

    /// True if `change` was produced for this subscription.
    pub fn matches(&self, change: &ContentSizeChange) -> bool {
        change.subscription == self.id && change.surface == self.surface
    }
}

/// A content-size change delivered to one subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentSizeChange {
    /// Subscription this change is addressed to.
    pub subscription: SubscriptionId,
    /// Surface whose content size changed.
    pub surface: ViewId,
    /// Previous content size.
    pub old: Size,
    /// New content size.
    pub new: Size,
}

impl ContentSizeChange {
    /// True if the height differs between the old and new sizes.
    pub fn height_changed(&self) -> bool {
        self.old.h != self.new.h
    }
}

/// Registration record for a live subscription.
#[derive(Debug, Clone, Copy)]
struct Observer {
    /// Observed surface.
    surface: ViewId,
    /// View that owns the subscription.
    owner: ViewId,
}

/// Registry of live subscriptions.
#[derive(Debug, Default)]
pub struct Observers {
    /// Live subscriptions.
    subs: SlotMap<SubscriptionId, Observer>,
    /// Reverse index from surface to its single subscription.
    by_surface: HashMap<ViewId, SubscriptionId>,
}

impl Observers {
    /// Subscribe `owner` to content-size changes of `surface`.
    ///
    /// A surface can have at most one observer.
    pub fn subscribe(&mut self, surface: ViewId, owner: ViewId) -> Result<Subscription> {
        if self.by_surface.contains_key(&surface) {
            return Err(Error::AlreadyObserved(surface));
        }
        let id = self.subs.insert(Observer { surface, owner });
        self.by_surface.insert(surface, id);
        tracing::debug!(?surface, ?owner, ?id, "subscribed to content size");
        Ok(Subscription { id, surface })
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn release(&mut self, token: Subscription) -> bool {
        let Some(obs) = self.subs.remove(token.id) else {
            return false;
        };
        if self.by_surface.get(&obs.surface) == Some(&token.id) {
            self.by_surface.remove(&obs.surface);
        }
        tracing::debug!(
            surface = ?obs.surface,
            owner = ?obs.owner,
            id = ?token.id,
            "released content size subscription"
        );
        true
    }

    /// Owner of a live subscription.
    pub fn owner(&self, id: SubscriptionId) -> Option<ViewId> {
        self.subs.get(id).map(|o| o.owner)
    }

    /// The subscription observing `surface`, if any.
    pub fn observing(&self, surface: ViewId) -> Option<SubscriptionId> {
        self.by_surface.get(&surface).copied()
    }

    /// True if the subscription is live.
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.subs.contains_key(id)
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// True if there are no live subscriptions.
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn ids() -> (ViewId, ViewId, ViewId) {
        let mut map: SlotMap<ViewId, ()> = SlotMap::with_key();
        (map.insert(()), map.insert(()), map.insert(()))
    }

    #[test]
    fn one_observer_per_surface() -> Result<()> {
        let (surface, a, b) = ids();
        let mut obs = Observers::default();
        let token = obs.subscribe(surface, a)?;
        assert_eq!(obs.subscribe(surface, b), Err(Error::AlreadyObserved(surface)));
        assert_eq!(obs.owner(token.id()), Some(a));
        assert!(obs.release(token));
        let again = obs.subscribe(surface, b)?;
        assert_eq!(obs.owner(again.id()), Some(b));
        Ok(())
    }

    #[test]
    fn released_ids_stay_dead() -> Result<()> {
        let (surface, a, _) = ids();
        let mut obs = Observers::default();
        let token = obs.subscribe(surface, a)?;
        let id = token.id();
        assert!(obs.release(token));
        assert!(!obs.is_live(id));
        let fresh = obs.subscribe(surface, a)?;
        assert_ne!(fresh.id(), id);
        assert_eq!(obs.owner(id), None);
        assert!(obs.observing(surface).is_some());
        Ok(())
    }

    #[test]
    fn matches_requires_same_surface() -> Result<()> {
        let (surface, a, other) = ids();
        let mut obs = Observers::default();
        let token = obs.subscribe(surface, a)?;
        let change = ContentSizeChange {
            subscription: token.id(),
            surface,
            old: Size::new(10.0, 10.0),
            new: Size::new(10.0, 20.0),
        };
        assert!(token.matches(&change));
        assert!(!token.matches(&ContentSizeChange {
            surface: other,
            ..change
        }));
        assert!(obs.release(token));
        Ok(())
    }
}
