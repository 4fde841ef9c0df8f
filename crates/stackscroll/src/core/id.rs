use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a view stored in the Core arena.
    ///
    /// Ids are generational: an id held after its view was removed never
    /// resolves to a different view, so holding one is a weak reference.
    pub struct ViewId;
}

/// Type-safe wrapper around a view identifier tied to a view kind.
pub struct TypedId<T> {
    /// Untyped view identifier.
    id: ViewId,
    /// Marker for the view kind.
    _marker: PhantomData<fn() -> T>,
}

impl<T> TypedId<T> {
    /// Wrap an untyped view identifier.
    pub(crate) fn new(id: ViewId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The untyped identifier.
    pub fn id(&self) -> ViewId {
        self.id
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> From<TypedId<T>> for ViewId {
    fn from(value: TypedId<T>) -> Self {
        value.id
    }
}

// Manual impls: derives would demand the same traits of `T`.

impl<T> fmt::Debug for TypedId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
