//! Ordered collections permitting duplicates.

mod equatable;
mod sequence;

pub use equatable::EquatableSequence;
pub use sequence::{ReadOnlySequence, Sequence};
