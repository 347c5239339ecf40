//! Capability traits shared by the containers.
//!
//! [`ReadBag`] and [`ReadSequence`] are the read contracts. [`Initializable`]
//! and [`Owned`] are narrow capabilities meant for loaders and for the
//! component owning a children collection; bring them into scope explicitly.

use crate::error::{Error, Result};
use function_name::named;
use std::rc::Rc;
use tracing::debug;

/// An element that carries its own key.
///
/// `None` means the key is not set yet. Containers indexing by key refuse
/// such elements with [`Error::NullArgument`](crate::Error::NullArgument).
pub trait Keyed<K> {
    fn key(&self) -> Option<K>;
}

/// Buffers `elements` and fails if any of them has no key, so that bulk
/// operations reject a batch before storing or attaching any of it.
#[named]
pub(crate) fn all_keyed<K, E, I>(elements: I) -> Result<Vec<E>>
where
    E: Keyed<K>,
    I: IntoIterator<Item = E>,
{
    let elements: Vec<E> = elements.into_iter().collect();
    match elements.iter().position(|element| element.key().is_none()) {
        Some(position) => {
            debug!(position, "batch rejected, element without a key");
            Err(Error::null(function_name!(), "element.key"))
        }
        None => Ok(elements),
    }
}

/// An element holding a non-owning back-reference to its parent.
///
/// The setter takes `&self`: children are usually shared handles, and the
/// collection updates the parent of a child the caller still holds.
pub trait Child<P> {
    fn parent(&self) -> Option<P>;
    fn set_parent(&self, parent: Option<P>);
}

/// Read contract of an unordered collection.
pub trait ReadBag<E> {
    type Iter<'a>: Iterator<Item = &'a E>
    where
        Self: 'a,
        E: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, element: &E) -> bool;

    fn iter(&self) -> Self::Iter<'_>;
}

/// Read contract of an ordered collection with positional access.
pub trait ReadSequence<E>: ReadBag<E> {
    /// Fails with [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange)
    /// when `index >= len`.
    fn get(&self, index: usize) -> Result<&E>;

    /// Cached snapshot of the items in order.
    ///
    /// The same `Rc` is handed out until the next append.
    fn to_array(&self) -> Rc<[E]>
    where
        E: Clone;
}

/// The single-element add primitive used by builders and deserializers.
///
/// Returns `Ok(false)` when the element was not added (duplicate element or
/// duplicate key), without touching the container.
pub trait Initializable<E> {
    fn add_item(&mut self, element: E) -> Result<bool>;
}

/// Owner reassignment for children collections.
pub trait Owned<P> {
    fn owner(&self) -> Option<&P>;

    /// Stores the new owner and pushes it onto every current child.
    fn set_owner(&mut self, owner: Option<P>);
}

/// Generic collection surface used by the markup integration layer.
///
/// Read-only containers accept [`insert`](ElementCollection::insert), which is
/// how they are bulk-loaded, and refuse the rest with
/// [`Error::InvalidOperation`](crate::Error::InvalidOperation).
pub trait ElementCollection<E> {
    fn is_read_only(&self) -> bool;

    fn insert(&mut self, element: E) -> Result<bool>;

    fn remove_element(&mut self, element: &E) -> Result<bool>;

    fn clear_elements(&mut self) -> Result<()>;
}

/// Post-restore step recomputing state that is not persisted.
///
/// Must run on a freshly deserialized value before it is used.
pub trait Restore {
    fn restore(&mut self);
}
