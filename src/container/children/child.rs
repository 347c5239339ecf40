use crate::container::contract::{Child, Keyed};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// The parent slot of a child element.
///
/// Embed it in an element type and point `#[derive(Child)]` at it with
/// `#[parent]`. The slot is a back-reference; mark the field
/// `#[serde(skip)]` so that restoring the owning collection fills it in.
#[derive(Debug, Clone)]
pub struct ParentCell<P> {
    parent: RefCell<Option<P>>,
}

impl<P> Default for ParentCell<P> {
    fn default() -> Self {
        ParentCell {
            parent: RefCell::new(None),
        }
    }
}

impl<P: Clone> ParentCell<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<P> {
        self.parent.borrow().clone()
    }

    pub fn set(&self, parent: Option<P>) {
        *self.parent.borrow_mut() = parent;
    }
}

impl<P: Clone> Child<P> for ParentCell<P> {
    fn parent(&self) -> Option<P> {
        self.get()
    }

    fn set_parent(&self, parent: Option<P>) {
        self.set(parent);
    }
}

/// A shared handle compared and hashed by identity.
///
/// Two handles are equal only when they point at the same allocation, so a
/// children collection can hold distinct elements that happen to have equal
/// contents. The handle persists as its inner value; identity is not
/// preserved across persist/restore.
pub struct Shared<T>(Rc<T>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Rc::new(value))
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(self, other)
    }
}

impl<T> Eq for Shared<T> {}

impl<T> Hash for Shared<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Rc::as_ptr(&self.0), state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Shared::new(value)
    }
}

impl<P, T: Child<P>> Child<P> for Shared<T> {
    fn parent(&self) -> Option<P> {
        self.0.parent()
    }

    fn set_parent(&self, parent: Option<P>) {
        self.0.set_parent(parent);
    }
}

impl<K, T: Keyed<K>> Keyed<K> for Shared<T> {
    fn key(&self) -> Option<K> {
        self.0.key()
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (*self.0).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Shared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Shared::new)
    }
}
