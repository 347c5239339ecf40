use crate::container::bag::ReadOnlyBag;
use crate::container::contract::{
    all_keyed, ElementCollection, Initializable, Keyed, ReadBag, Restore,
};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, Entry, HashMap};
use std::hash::Hash;
use std::iter::Flatten;
use std::ops::Deref;
use tracing::debug;

type Elements<'a, K, E> = Flatten<hash_map::Values<'a, K, ReadOnlyBag<E>>>;

/// Elements grouped in bags by their own key.
///
/// Iteration visits every element of every bag; [`len`](Self::len) is the
/// total element count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, E: Deserialize<'de> + Eq + Hash"
))]
pub struct ReadOnlyMultiMap<K, E> {
    map: HashMap<K, ReadOnlyBag<E>>,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    empty: ReadOnlyBag<E>,
}

impl<K, E> Default for ReadOnlyMultiMap<K, E> {
    fn default() -> Self {
        ReadOnlyMultiMap {
            map: HashMap::new(),
            count: 0,
            empty: ReadOnlyBag::default(),
        }
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> ReadOnlyMultiMap<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<I: IntoIterator<Item = E>>(elements: I) -> Result<Self> {
        let mut map = Self::new();
        for element in all_keyed::<K, _, _>(elements)? {
            map.add_item(element)?;
        }
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The bag under `key`, or the shared empty bag.
    pub fn get(&self, key: &K) -> &ReadOnlyBag<E> {
        self.map.get(key).unwrap_or(&self.empty)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, ReadOnlyBag<E>> {
        self.map.keys()
    }

    pub fn iter(&self) -> Elements<'_, K, E> {
        self.map.values().flatten()
    }

    pub fn snapshot(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().cloned().collect()
    }

    #[named]
    fn key_of(element: &E) -> Result<K> {
        element
            .key()
            .ok_or_else(|| Error::null(function_name!(), "element.key"))
    }

    fn remove_item(&mut self, element: &E) -> Result<bool> {
        let key = Self::key_of(element)?;
        let Entry::Occupied(mut slot) = self.map.entry(key) else {
            return Ok(false);
        };
        if !slot.get_mut().remove_item(element) {
            return Ok(false);
        }
        debug_assert!(self.count > 0, "multi-map count is stale; restore() was not called");
        self.count = self.count.saturating_sub(1);
        if slot.get().is_empty() {
            slot.remove();
        }
        Ok(true)
    }

    fn remove_key_items(&mut self, key: &K) -> bool {
        match self.map.remove(key) {
            Some(bag) => {
                debug_assert!(
                    self.count >= bag.len(),
                    "multi-map count is stale; restore() was not called"
                );
                self.count = self.count.saturating_sub(bag.len());
                true
            }
            None => false,
        }
    }

    fn clear_items(&mut self) {
        self.map.clear();
        self.count = 0;
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> Initializable<E> for ReadOnlyMultiMap<K, E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        let key = Self::key_of(&element)?;
        let bag = self.map.entry(key).or_default();
        if bag.insert(element) {
            self.count += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> ReadBag<E> for ReadOnlyMultiMap<K, E> {
    type Iter<'a> = Elements<'a, K, E> where Self: 'a, E: 'a;

    fn len(&self) -> usize {
        self.count
    }

    fn contains(&self, element: &E) -> bool {
        element
            .key()
            .and_then(|key| self.map.get(&key))
            .map_or(false, |bag| bag.contains(element))
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.map.values().flatten()
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> ElementCollection<E> for ReadOnlyMultiMap<K, E> {
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

impl<K, E: Eq + Hash> Restore for ReadOnlyMultiMap<K, E> {
    fn restore(&mut self) {
        self.count = self.map.values().map(ReadOnlyBag::len).sum();
        debug!(count = self.count, "recounted multi-map");
    }
}

/// A [`ReadOnlyMultiMap`] open to removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, E: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, E: Deserialize<'de> + Eq + Hash"
))]
pub struct MultiMap<K, E> {
    map: ReadOnlyMultiMap<K, E>,
}

impl<K, E> Default for MultiMap<K, E> {
    fn default() -> Self {
        MultiMap {
            map: ReadOnlyMultiMap::default(),
        }
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> MultiMap<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements<I: IntoIterator<Item = E>>(elements: I) -> Result<Self> {
        Ok(MultiMap {
            map: ReadOnlyMultiMap::from_elements(elements)?,
        })
    }

    pub fn add(&mut self, element: E) -> Result<bool> {
        self.map.add_item(element)
    }

    pub fn add_all<I: IntoIterator<Item = E>>(&mut self, elements: I) -> Result<()> {
        for element in all_keyed::<K, _, _>(elements)? {
            self.map.add_item(element)?;
        }
        Ok(())
    }

    /// Removes one element, dropping its bag once empty.
    pub fn remove(&mut self, element: &E) -> Result<bool> {
        self.map.remove_item(element)
    }

    /// Removes every element under `key`.
    pub fn remove_key(&mut self, key: &K) -> bool {
        self.map.remove_key_items(key)
    }

    pub fn clear(&mut self) {
        self.map.clear_items();
    }
}

impl<K, E> Deref for MultiMap<K, E> {
    type Target = ReadOnlyMultiMap<K, E>;

    fn deref(&self) -> &ReadOnlyMultiMap<K, E> {
        &self.map
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> Initializable<E> for MultiMap<K, E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        self.add(element)
    }
}

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> ReadBag<E> for MultiMap<K, E> {
    type Iter<'a> = Elements<'a, K, E> where Self: 'a, E: 'a;

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

impl<K: Eq + Hash, E: Keyed<K> + Eq + Hash> ElementCollection<E> for MultiMap<K, E> {
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

impl<K, E: Eq + Hash> Restore for MultiMap<K, E> {
    fn restore(&mut self) {
        self.map.restore();
    }
}
