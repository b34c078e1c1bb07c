use crate::Svc;
use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(0);

/// Untyped information about a [`Key`]. Two keys are equal only if they were
/// created by the same call to [`Key::new()`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct KeyInfo {
    id: u64,
    name: &'static str,
}

impl KeyInfo {
    /// Gets the unique id of the key.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the display name the key was created with. Names are not unique.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Display for KeyInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({}#{})", self.name, self.id)
    }
}

/// A capability identifier. Implementations are bound to keys, and keys are
/// used to request instances of those implementations from a
/// [`Container`](crate::Container).
///
/// The type parameter is the contract that every implementation bound to the
/// key fulfills. It only exists at compile time, and is usually a trait
/// object declared with [`interface!`](crate::interface).
///
/// ## Example
///
/// ```
/// use keyed_injector::Key;
///
/// trait Bird: Send + Sync {}
///
/// let first: Key<dyn Bird> = Key::new("Bird");
/// let second: Key<dyn Bird> = Key::new("Bird");
///
/// // Keys with matching names are still distinct
/// assert_ne!(first, second);
/// let copy = first;
/// assert_eq!(first, copy);
/// ```
pub struct Key<I: ?Sized> {
    info: KeyInfo,
    marker: PhantomData<fn() -> Svc<I>>,
}

impl<I: ?Sized> Key<I> {
    /// Creates a new, globally unique key.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Key {
            info: KeyInfo {
                id: NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed),
                name,
            },
            marker: PhantomData,
        }
    }

    /// Gets the untyped information about this key.
    #[inline]
    #[must_use]
    pub fn info(&self) -> KeyInfo {
        self.info
    }

    /// Gets the display name of this key.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.info.name
    }
}

impl<I: ?Sized> Clone for Key<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for Key<I> {}

impl<I: ?Sized> PartialEq for Key<I> {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}

impl<I: ?Sized> Eq for Key<I> {}

impl<I: ?Sized> Hash for Key<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.hash(state);
    }
}

impl<I: ?Sized> Debug for Key<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("id", &self.info.id)
            .field("name", &self.info.name)
            .field("contract", &std::any::type_name::<I>())
            .finish()
    }
}

impl<I: ?Sized> Display for Key<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.info, f)
    }
}

impl<I: ?Sized> From<Key<I>> for KeyInfo {
    fn from(key: Key<I>) -> Self {
        key.info
    }
}
