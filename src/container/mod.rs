//! In-memory containers for building content models.
//!
//! Every container comes as a read-only type, which can only be filled at
//! construction time or through [`Initializable::add_item`], and (where
//! mutation makes sense) a mutable wrapper that dereferences to it:
//!
//! ```text
//! ReadOnlyBag<E>            Bag<E>, EquatableBag<E>
//! ReadOnlySequence<T>       Sequence<T>, EquatableSequence<T>
//! ReadOnlyMap<K, E>         Map<K, E>
//! ReadOnlyMultiDictionary   MultiDictionary<K, E, B>
//! ReadOnlyMultiMap<K, E>    MultiMap<K, E>
//! ReadOnlyBiGramSet<F, S>
//! ReadOnlyChildren<P, C>    Children<P, C>
//! KeyedReadOnlyChildren     KeyedChildren<P, K, C>
//! OrderedKeyedReadOnlyChildren<P, K, C>
//! ```
//!
//! Children collections keep the `parent` of each contained element equal to
//! the collection's owner. The owner is a handle (an id, an `Rc`, ...) and is
//! never owned by the children.
//!
//! Cached state (hash codes, element counts, array snapshots, secondary
//! indices) is not persisted. Call [`Restore::restore`] on a deserialized
//! container before using it.
//!
//! [`Initializable::add_item`]: contract::Initializable::add_item
//! [`Restore::restore`]: contract::Restore::restore

pub mod bag;
pub mod children;
pub mod contract;
pub mod map;
pub mod multi;
pub mod sequence;

pub use bag::{Bag, EquatableBag, ReadOnlyBag};
pub use children::{
    Children, KeyedChildren, KeyedReadOnlyChildren, OrderedKeyedReadOnlyChildren, ParentCell,
    ReadOnlyChildren, Shared,
};
pub use contract::{Child, ElementCollection, Keyed, ReadBag, ReadSequence, Restore};
pub use map::{Map, ReadOnlyMap};
pub use multi::{
    MultiDictionary, MultiMap, ReadOnlyBiGramSet, ReadOnlyMultiDictionary, ReadOnlyMultiMap,
    UniformBiGramSet,
};
pub use sequence::{EquatableSequence, ReadOnlySequence, Sequence};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash code of a single element.
///
/// Uses a fixed-key hasher, so the value is stable across runs and survives
/// persist/restore.
pub(crate) fn hash_code<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
