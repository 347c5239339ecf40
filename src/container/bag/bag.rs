use crate::container::contract::{ElementCollection, Initializable, ReadBag, Restore};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::collections::{hash_set, HashSet};
use std::hash::Hash;
use std::ops::Deref;
use tracing::trace;

/// An unordered collection of unique elements, filled at construction.
///
/// Iteration order is unspecified and may change after any insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "E: Serialize",
    deserialize = "E: Deserialize<'de> + Eq + Hash"
))]
pub struct ReadOnlyBag<E> {
    collection: HashSet<E>,
}

impl<E> Default for ReadOnlyBag<E> {
    fn default() -> Self {
        ReadOnlyBag {
            collection: HashSet::new(),
        }
    }
}

impl<E: Eq + Hash> ReadOnlyBag<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ReadOnlyBag {
            collection: HashSet::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn contains(&self, element: &E) -> bool {
        self.collection.contains(element)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, E> {
        self.collection.iter()
    }

    /// Fresh copy of the current contents.
    pub fn snapshot(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.collection.iter().cloned().collect()
    }

    pub(crate) fn insert(&mut self, element: E) -> bool {
        let added = self.collection.insert(element);
        if !added {
            trace!("duplicate element ignored");
        }
        added
    }

    /// Removes and returns the stored element equal to `element`.
    pub(crate) fn take(&mut self, element: &E) -> Option<E> {
        self.collection.take(element)
    }

    pub(crate) fn remove_item(&mut self, element: &E) -> bool {
        self.collection.remove(element)
    }

    pub(crate) fn clear_items(&mut self) {
        self.collection.clear();
    }
}

/// Set equality, independent of order.
impl<E: Eq + Hash> PartialEq for ReadOnlyBag<E> {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection
    }
}

impl<E: Eq + Hash> Eq for ReadOnlyBag<E> {}

impl<E: Eq + Hash> FromIterator<E> for ReadOnlyBag<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        ReadOnlyBag {
            collection: iter.into_iter().collect(),
        }
    }
}

impl<'a, E> IntoIterator for &'a ReadOnlyBag<E> {
    type Item = &'a E;
    type IntoIter = hash_set::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.collection.iter()
    }
}

impl<E: Eq + Hash> Initializable<E> for ReadOnlyBag<E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        Ok(self.insert(element))
    }
}

impl<E: Eq + Hash> ReadBag<E> for ReadOnlyBag<E> {
    type Iter<'a> = hash_set::Iter<'a, E> where Self: 'a, E: 'a;

    fn len(&self) -> usize {
        self.collection.len()
    }

    fn contains(&self, element: &E) -> bool {
        self.collection.contains(element)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.collection.iter()
    }
}

impl<E: Eq + Hash> ElementCollection<E> for ReadOnlyBag<E> {
    fn is_read_only(&self) -> bool {
        true
    }

    fn insert(&mut self, element: E) -> Result<bool> {
        self.add_item(element)
    }

    #[named]
    fn remove_element(&mut self, _element: &E) -> Result<bool> {
        Err(Error::read_only(function_name!()))
    }

    #[named]
    fn clear_elements(&mut self) -> Result<()> {
        Err(Error::read_only(function_name!()))
    }
}

impl<E> Restore for ReadOnlyBag<E> {
    fn restore(&mut self) {}
}

/// A [`ReadOnlyBag`] open to removal and clearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "E: Serialize",
    deserialize = "E: Deserialize<'de> + Eq + Hash"
))]
pub struct Bag<E> {
    bag: ReadOnlyBag<E>,
}

impl<E> Default for Bag<E> {
    fn default() -> Self {
        Bag {
            bag: ReadOnlyBag::default(),
        }
    }
}

impl<E: Eq + Hash> Bag<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when an equal element is already present.
    pub fn add(&mut self, element: E) -> bool {
        self.bag.insert(element)
    }

    pub fn remove(&mut self, element: &E) -> bool {
        self.bag.remove_item(element)
    }

    pub fn clear(&mut self) {
        self.bag.clear_items();
    }
}

impl<E> Deref for Bag<E> {
    type Target = ReadOnlyBag<E>;

    fn deref(&self) -> &ReadOnlyBag<E> {
        &self.bag
    }
}

impl<E: Eq + Hash> PartialEq for Bag<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bag == other.bag
    }
}

impl<E: Eq + Hash> FromIterator<E> for Bag<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Bag {
            bag: iter.into_iter().collect(),
        }
    }
}

impl<E: Eq + Hash> Initializable<E> for Bag<E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        Ok(self.add(element))
    }
}

impl<E: Eq + Hash> ReadBag<E> for Bag<E> {
    type Iter<'a> = hash_set::Iter<'a, E> where Self: 'a, E: 'a;

    fn len(&self) -> usize {
        self.bag.len()
    }

    fn contains(&self, element: &E) -> bool {
        self.bag.contains(element)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.bag.iter()
    }
}

impl<E: Eq + Hash> ElementCollection<E> for Bag<E> {
    fn is_read_only(&self) -> bool {
        false
    }

    fn insert(&mut self, element: E) -> Result<bool> {
        Ok(self.add(element))
    }

    fn remove_element(&mut self, element: &E) -> Result<bool> {
        Ok(self.remove(element))
    }

    fn clear_elements(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<E> Restore for Bag<E> {
    fn restore(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicates_are_rejected() {
        let mut bag = Bag::new();
        assert!(bag.add("a"));
        assert!(bag.add("b"));
        assert_eq!(bag.len(), 2);

        assert!(!bag.add("a"));
        assert_eq!(bag.len(), 2);
    }

    #[test]
    fn remove_and_clear() {
        let mut bag: Bag<i32> = (1..=4).collect();
        assert!(bag.remove(&2));
        assert!(!bag.remove(&2));
        assert!(!bag.contains(&2));
        assert_eq!(bag.len(), 3);

        bag.clear();
        assert!(bag.is_empty());
    }

    #[test]
    fn iteration_reflects_current_contents() {
        let mut bag: Bag<i32> = [3, 1].into_iter().collect();
        let mut seen = bag.snapshot();
        seen.sort();
        assert_eq!(seen, vec![1, 3]);

        bag.add(2);
        let mut seen: Vec<i32> = bag.iter().copied().collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn read_only_bag_refuses_removal() {
        let mut bag: ReadOnlyBag<i32> = [1, 2].into_iter().collect();
        assert!(bag.is_read_only());
        assert!(bag.insert(3));
        assert_eq!(ElementCollection::insert(&mut bag, 3), Ok(false));
        assert!(matches!(
            bag.remove_element(&1),
            Err(Error::InvalidOperation { .. })
        ));
        assert!(matches!(
            bag.clear_elements(),
            Err(Error::InvalidOperation { .. })
        ));
        assert_eq!(bag.len(), 3);
    }
}
