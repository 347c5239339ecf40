//! Generic in-memory content model containers.
//!
//! Bags, sequences, keyed maps, multi-dictionaries and bi-gram sets, the
//! equatable variants usable as map keys, and children collections that keep
//! each element's parent in step with their owner.

extern crate self as content_model;

pub mod container;
pub mod error;
pub mod extensions;
pub mod persist;
pub mod relationship;

#[cfg(test)]
mod test;
#[cfg(test)]
mod testing;

pub use container::{
    Bag, Child, Children, ElementCollection, EquatableBag, EquatableSequence, Keyed,
    KeyedChildren, KeyedReadOnlyChildren, Map, MultiDictionary, MultiMap,
    OrderedKeyedReadOnlyChildren, ParentCell, ReadBag, ReadOnlyBag, ReadOnlyBiGramSet,
    ReadOnlyChildren, ReadOnlyMap, ReadOnlyMultiDictionary, ReadOnlyMultiMap, ReadOnlySequence,
    ReadSequence, Restore, Sequence, Shared, UniformBiGramSet,
};
pub use content_model_macros::{Child, Keyed};
pub use error::{Error, Result};
pub use extensions::MultiDictionaryExt;
pub use relationship::{act_many_to_many, act_many_to_many_seeded};
