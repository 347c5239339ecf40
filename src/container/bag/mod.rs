//! Unordered collections of unique elements.

mod bag;
mod equatable;

pub use bag::{Bag, ReadOnlyBag};
pub use equatable::EquatableBag;
