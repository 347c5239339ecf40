use crate::container::bag::ReadOnlyBag;
use crate::container::contract::{Child, ElementCollection, Initializable, Owned, ReadBag, Restore};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::collections::hash_set;
use std::hash::Hash;
use std::ops::Deref;
use tracing::{debug, trace};

/// An unordered set of children attached to one owner.
///
/// Every contained child has its parent set to the owner. Reassigning the
/// owner through [`Owned::set_owner`] updates all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize, C: Serialize",
    deserialize = "P: Deserialize<'de>, C: Deserialize<'de> + Eq + Hash"
))]
pub struct ReadOnlyChildren<P, C> {
    owner: Option<P>,
    children: ReadOnlyBag<C>,
}

impl<P, C> Default for ReadOnlyChildren<P, C> {
    fn default() -> Self {
        ReadOnlyChildren {
            owner: None,
            children: ReadOnlyBag::default(),
        }
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> ReadOnlyChildren<P, C> {
    pub fn new(owner: Option<P>) -> Self {
        ReadOnlyChildren {
            owner,
            children: ReadOnlyBag::new(),
        }
    }

    pub fn with_children<I: IntoIterator<Item = C>>(owner: Option<P>, children: I) -> Self {
        let mut collection = Self::new(owner);
        for child in children {
            collection.insert(child);
        }
        collection
    }

    pub fn owner(&self) -> Option<&P> {
        self.owner.as_ref()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, child: &C) -> bool {
        self.children.contains(child)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, C> {
        self.children.iter()
    }

    pub fn snapshot(&self) -> Vec<C>
    where
        C: Clone,
    {
        self.children.snapshot()
    }

    pub(crate) fn insert(&mut self, child: C) -> bool {
        if self.children.contains(&child) {
            trace!("child already present");
            return false;
        }
        child.set_parent(self.owner.clone());
        self.children.insert(child)
    }

    pub(crate) fn detach(&mut self, child: &C) -> bool {
        match self.children.take(child) {
            Some(stored) => {
                stored.set_parent(None);
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach_all(&mut self) {
        for child in self.children.iter() {
            child.set_parent(None);
        }
        self.children.clear_items();
    }

    fn push_owner(&self) {
        for child in self.children.iter() {
            child.set_parent(self.owner.clone());
        }
        debug!(children = self.children.len(), "pushed owner onto children");
    }
}

impl<'a, P, C> IntoIterator for &'a ReadOnlyChildren<P, C> {
    type Item = &'a C;
    type IntoIter = hash_set::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        (&self.children).into_iter()
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Owned<P> for ReadOnlyChildren<P, C> {
    fn owner(&self) -> Option<&P> {
        self.owner.as_ref()
    }

    fn set_owner(&mut self, owner: Option<P>) {
        self.owner = owner;
        self.push_owner();
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Initializable<C> for ReadOnlyChildren<P, C> {
    fn add_item(&mut self, child: C) -> Result<bool> {
        Ok(self.insert(child))
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> ReadBag<C> for ReadOnlyChildren<P, C> {
    type Iter<'a> = hash_set::Iter<'a, C> where Self: 'a, C: 'a;

    fn len(&self) -> usize {
        self.children.len()
    }

    fn contains(&self, child: &C) -> bool {
        self.children.contains(child)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.children.iter()
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> ElementCollection<C> for ReadOnlyChildren<P, C> {
    fn is_read_only(&self) -> bool {
        true
    }

    fn insert(&mut self, child: C) -> Result<bool> {
        self.add_item(child)
    }

    #[named]
    fn remove_element(&mut self, _child: &C) -> Result<bool> {
        Err(Error::read_only(function_name!()))
    }

    #[named]
    fn clear_elements(&mut self) -> Result<()> {
        Err(Error::read_only(function_name!()))
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Restore for ReadOnlyChildren<P, C> {
    fn restore(&mut self) {
        self.push_owner();
    }
}

/// A [`ReadOnlyChildren`] open to addition and removal.
///
/// Removed and cleared children get their parent unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "P: Serialize, C: Serialize",
    deserialize = "P: Deserialize<'de>, C: Deserialize<'de> + Eq + Hash"
))]
pub struct Children<P, C> {
    children: ReadOnlyChildren<P, C>,
}

impl<P, C> Default for Children<P, C> {
    fn default() -> Self {
        Children {
            children: ReadOnlyChildren::default(),
        }
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Children<P, C> {
    pub fn new(owner: Option<P>) -> Self {
        Children {
            children: ReadOnlyChildren::new(owner),
        }
    }

    pub fn with_children<I: IntoIterator<Item = C>>(owner: Option<P>, children: I) -> Self {
        Children {
            children: ReadOnlyChildren::with_children(owner, children),
        }
    }

    /// Attaches `child`; `false` when it is already present.
    pub fn add(&mut self, child: C) -> bool {
        self.children.insert(child)
    }

    pub fn add_all<I: IntoIterator<Item = C>>(&mut self, children: I) {
        for child in children {
            self.children.insert(child);
        }
    }

    /// Detaches and removes `child`.
    pub fn remove(&mut self, child: &C) -> bool {
        self.children.detach(child)
    }

    /// Detaches every child, then empties the collection.
    pub fn clear(&mut self) {
        self.children.detach_all();
    }
}

impl<P, C> Deref for Children<P, C> {
    type Target = ReadOnlyChildren<P, C>;

    fn deref(&self) -> &ReadOnlyChildren<P, C> {
        &self.children
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Owned<P> for Children<P, C> {
    fn owner(&self) -> Option<&P> {
        self.children.owner()
    }

    fn set_owner(&mut self, owner: Option<P>) {
        self.children.set_owner(owner);
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Initializable<C> for Children<P, C> {
    fn add_item(&mut self, child: C) -> Result<bool> {
        Ok(self.add(child))
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> ReadBag<C> for Children<P, C> {
    type Iter<'a> = hash_set::Iter<'a, C> where Self: 'a, C: 'a;

    fn len(&self) -> usize {
        self.children.len()
    }

    fn contains(&self, child: &C) -> bool {
        self.children.contains(child)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.children.iter()
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> ElementCollection<C> for Children<P, C> {
    fn is_read_only(&self) -> bool {
        false
    }

    fn insert(&mut self, child: C) -> Result<bool> {
        Ok(self.add(child))
    }

    fn remove_element(&mut self, child: &C) -> Result<bool> {
        Ok(self.remove(child))
    }

    fn clear_elements(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<P: Clone, C: Child<P> + Eq + Hash> Restore for Children<P, C> {
    fn restore(&mut self) {
        self.children.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::children::{ParentCell, Shared};

    #[derive(Debug, Default)]
    struct Leaf {
        parent: ParentCell<&'static str>,
    }

    impl Child<&'static str> for Leaf {
        fn parent(&self) -> Option<&'static str> {
            self.parent.get()
        }

        fn set_parent(&self, parent: Option<&'static str>) {
            self.parent.set(parent);
        }
    }

    fn leaf() -> Shared<Leaf> {
        Shared::new(Leaf::default())
    }

    #[test]
    fn construction_attaches() {
        let (a, b) = (leaf(), leaf());
        let children = Children::with_children(Some("root"), [a.clone(), b.clone()]);
        assert_eq!(children.len(), 2);
        assert_eq!(a.parent(), Some("root"));
        assert_eq!(b.parent(), Some("root"));
        assert_eq!(children.owner(), Some(&"root"));
    }

    #[test]
    fn add_remove_clear_track_parent() {
        let mut children = Children::new(Some("root"));
        let (a, b, c) = (leaf(), leaf(), leaf());
        assert!(children.add(a.clone()));
        assert!(!children.add(a.clone()));
        children.add_all([b.clone(), c.clone()]);

        assert!(children.remove(&a));
        assert!(!children.remove(&a));
        assert_eq!(a.parent(), None);
        assert_eq!(b.parent(), Some("root"));

        children.clear();
        assert!(children.is_empty());
        assert_eq!(b.parent(), None);
        assert_eq!(c.parent(), None);
    }

    #[test]
    fn owner_reassignment_reaches_every_child() {
        let (a, b) = (leaf(), leaf());
        let mut children = Children::with_children(Some("old"), [a.clone(), b.clone()]);
        children.set_owner(Some("new"));
        assert_eq!(a.parent(), Some("new"));
        assert_eq!(b.parent(), Some("new"));
        assert_eq!(Owned::owner(&children), Some(&"new"));
    }

    #[test]
    fn read_only_children_refuse_removal() {
        let a = leaf();
        let mut children = ReadOnlyChildren::with_children(Some("root"), [a.clone()]);
        assert!(matches!(
            children.remove_element(&a),
            Err(Error::InvalidOperation { .. })
        ));
        assert_eq!(a.parent(), Some("root"));
    }
}
