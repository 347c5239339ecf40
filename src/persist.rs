//! Hooks for values coming back from a serde deserializer.
//!
//! Containers persist only their structural state. Hash codes, element
//! counts, array snapshots, key indices, secondary indices and children's
//! parent back-references are rebuilt by [`Restore::restore`], which has to
//! run before the value is used:
//!
//! ```
//! use content_model::{persist, EquatableBag};
//!
//! let bag: EquatableBag<u8> = [1, 2, 3].into_iter().collect();
//! let json = serde_json::to_string(&bag).unwrap();
//! let back: EquatableBag<u8> = persist::restored(serde_json::from_str(&json).unwrap());
//! assert_eq!(back, bag);
//! ```

pub use crate::container::contract::Restore;

/// Runs the post-restore step on a freshly deserialized value.
pub fn restored<T: Restore>(mut value: T) -> T {
    value.restore();
    value
}
