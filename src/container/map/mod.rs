use crate::container::contract::{
    all_keyed, ElementCollection, Initializable, Keyed, ReadBag, Restore,
};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, Entry, HashMap};
use std::hash::Hash;
use std::ops::Deref;
use tracing::trace;

/// Elements indexed by their own key, at most one element per key.
///
/// Adding an element whose key is already present is a no-op; the first
/// element inserted under a key wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, E: Deserialize<'de>"
))]
pub struct ReadOnlyMap<K, E> {
    dictionary: HashMap<K, E>,
}

impl<K, E> Default for ReadOnlyMap<K, E> {
    fn default() -> Self {
        ReadOnlyMap {
            dictionary: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, E: Keyed<K>> ReadOnlyMap<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `elements`, skipping elements with a duplicate key.
    pub fn from_elements<I: IntoIterator<Item = E>>(elements: I) -> Result<Self> {
        let mut map = Self::new();
        for element in all_keyed::<K, _, _>(elements)? {
            map.insert(element)?;
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    /// Fails with [`Error::KeyNotFound`] when no element has `key`.
    pub fn get(&self, key: &K) -> Result<&E> {
        self.dictionary.get(key).ok_or(Error::KeyNotFound)
    }

    pub fn try_get(&self, key: &K) -> Option<&E> {
        self.dictionary.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.dictionary.contains_key(key)
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, E> {
        self.dictionary.keys()
    }

    pub fn iter(&self) -> hash_map::Values<'_, K, E> {
        self.dictionary.values()
    }

    pub fn snapshot(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.dictionary.values().cloned().collect()
    }

    #[named]
    pub(crate) fn key_of(element: &E) -> Result<K> {
        element
            .key()
            .ok_or_else(|| Error::null(function_name!(), "element.key"))
    }

    pub(crate) fn insert(&mut self, element: E) -> Result<bool> {
        let key = Self::key_of(&element)?;
        match self.dictionary.entry(key) {
            Entry::Occupied(_) => {
                trace!("element with an existing key ignored");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                slot.insert(element);
                Ok(true)
            }
        }
    }

    pub(crate) fn take_key(&mut self, key: &K) -> Option<E> {
        self.dictionary.remove(key)
    }

    pub(crate) fn clear_items(&mut self) {
        self.dictionary.clear();
    }
}

impl<'a, K, E> IntoIterator for &'a ReadOnlyMap<K, E> {
    type Item = &'a E;
    type IntoIter = hash_map::Values<'a, K, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.dictionary.values()
    }
}

impl<K: Eq + Hash, E: Keyed<K>> Initializable<E> for ReadOnlyMap<K, E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        self.insert(element)
    }
}

/// Membership is decided by key, as for any keyed collection.
impl<K: Eq + Hash, E: Keyed<K>> ReadBag<E> for ReadOnlyMap<K, E> {
    type Iter<'a> = hash_map::Values<'a, K, E> where Self: 'a, E: 'a;

    fn len(&self) -> usize {
        self.dictionary.len()
    }

    fn contains(&self, element: &E) -> bool {
        element
            .key()
            .map_or(false, |key| self.dictionary.contains_key(&key))
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.dictionary.values()
    }
}

impl<K: Eq + Hash, E: Keyed<K>> ElementCollection<E> for ReadOnlyMap<K, E> {
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

impl<K, E> Restore for ReadOnlyMap<K, E> {
    fn restore(&mut self) {}
}

/// A [`ReadOnlyMap`] open to addition and removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, E: Deserialize<'de>"
))]
pub struct Map<K, E> {
    map: ReadOnlyMap<K, E>,
}

impl<K, E> Default for Map<K, E> {
    fn default() -> Self {
        Map {
            map: ReadOnlyMap::default(),
        }
    }
}

impl<K: Eq + Hash, E: Keyed<K>> Map<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<I: IntoIterator<Item = E>>(elements: I) -> Result<Self> {
        Ok(Map {
            map: ReadOnlyMap::from_elements(elements)?,
        })
    }

    /// Returns `Ok(false)` without replacing anything when the key is taken.
    pub fn add(&mut self, element: E) -> Result<bool> {
        self.map.insert(element)
    }

    /// Adds nothing when any of `elements` has no key.
    pub fn add_all<I: IntoIterator<Item = E>>(&mut self, elements: I) -> Result<()> {
        for element in all_keyed::<K, _, _>(elements)? {
            self.map.insert(element)?;
        }
        Ok(())
    }

    /// Removes whatever element is stored under the key of `element`.
    pub fn remove(&mut self, element: &E) -> Result<bool> {
        let key = ReadOnlyMap::<K, E>::key_of(element)?;
        Ok(self.map.take_key(&key).is_some())
    }

    pub fn remove_key(&mut self, key: &K) -> bool {
        self.map.take_key(key).is_some()
    }

    pub fn clear(&mut self) {
        self.map.clear_items();
    }
}

impl<K, E> Deref for Map<K, E> {
    type Target = ReadOnlyMap<K, E>;

    fn deref(&self) -> &ReadOnlyMap<K, E> {
        &self.map
    }
}

impl<K: Eq + Hash, E: Keyed<K>> Initializable<E> for Map<K, E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        self.add(element)
    }
}

impl<K: Eq + Hash, E: Keyed<K>> ReadBag<E> for Map<K, E> {
    type Iter<'a> = hash_map::Values<'a, K, E> where Self: 'a, E: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, element: &E) -> bool {
        ReadBag::contains(&self.map, element)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.map.iter()
    }
}

impl<K: Eq + Hash, E: Keyed<K>> ElementCollection<E> for Map<K, E> {
    fn is_read_only(&self) -> bool {
        false
    }

    fn insert(&mut self, element: E) -> Result<bool> {
        self.add(element)
    }

    fn remove_element(&mut self, element: &E) -> Result<bool> {
        self.remove(element)
    }

    fn clear_elements(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<K, E> Restore for Map<K, E> {
    fn restore(&mut self) {}
}
