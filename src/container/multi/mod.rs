//! One-to-many containers: multi-dictionaries, multi-maps and bi-gram sets.

mod bigram;
mod dictionary;
mod multimap;

pub use bigram::{ReadOnlyBiGramSet, UniformBiGramSet};
pub use dictionary::{MultiDictionary, ReadOnlyMultiDictionary};
pub use multimap::{MultiMap, ReadOnlyMultiMap};
