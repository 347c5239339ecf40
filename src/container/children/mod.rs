//! Collections that keep their children's parent in step with an owner.
//!
//! A child enters a collection detached or attached elsewhere and leaves it
//! with its parent unset:
//!
//! ```text
//! detached --add--> attached(owner) --remove/remove_key/clear--> detached
//!                   attached(owner) --set_owner(new)--> attached(new)
//! ```

mod child;
mod children;
mod keyed;
mod ordered;

pub use child::{ParentCell, Shared};
pub use children::{Children, ReadOnlyChildren};
pub use keyed::{KeyedChildren, KeyedReadOnlyChildren};
pub use ordered::OrderedKeyedReadOnlyChildren;
