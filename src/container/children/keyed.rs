use crate::container::contract::{
    all_keyed, Child, ElementCollection, Initializable, Keyed, Owned, ReadBag, Restore,
};
use crate::container::map::ReadOnlyMap;
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::hash::Hash;
use std::ops::Deref;
use tracing::{debug, trace};

/// Children attached to one owner, at most one per key.
///
/// Dereferences to the underlying [`ReadOnlyMap`] for keyed lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize, K: Serialize, C: Serialize",
    deserialize = "P: Deserialize<'de>, K: Deserialize<'de> + Eq + Hash, C: Deserialize<'de>"
))]
pub struct KeyedReadOnlyChildren<P, K, C> {
    owner: Option<P>,
    map: ReadOnlyMap<K, C>,
}

impl<P, K, C> Default for KeyedReadOnlyChildren<P, K, C> {
    fn default() -> Self {
        KeyedReadOnlyChildren {
            owner: None,
            map: ReadOnlyMap::default(),
        }
    }
}

impl<P, K, C> KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    pub fn new(owner: Option<P>) -> Self {
        KeyedReadOnlyChildren {
            owner,
            map: ReadOnlyMap::new(),
        }
    }

    /// Fails without attaching anything when any child has no key.
    pub fn with_children<I: IntoIterator<Item = C>>(owner: Option<P>, children: I) -> Result<Self> {
        let mut collection = Self::new(owner);
        collection.insert_all(children)?;
        Ok(collection)
    }

    pub fn owner(&self) -> Option<&P> {
        self.owner.as_ref()
    }

    pub(crate) fn insert(&mut self, child: C) -> Result<bool> {
        let key = ReadOnlyMap::<K, C>::key_of(&child)?;
        if self.map.contains_key(&key) {
            trace!("key already taken by another child");
            return Ok(false);
        }
        child.set_parent(self.owner.clone());
        self.map.insert(child)
    }

    pub(crate) fn insert_all<I: IntoIterator<Item = C>>(&mut self, children: I) -> Result<()> {
        for child in all_keyed::<K, _, _>(children)? {
            self.insert(child)?;
        }
        Ok(())
    }

    pub(crate) fn detach(&mut self, child: &C) -> Result<bool>
    where
        C: PartialEq,
    {
        let key = ReadOnlyMap::<K, C>::key_of(child)?;
        let stored_here = self.map.try_get(&key).map_or(false, |stored| stored == child);
        Ok(stored_here && self.detach_key(&key))
    }

    pub(crate) fn detach_key(&mut self, key: &K) -> bool {
        match self.map.take_key(key) {
            Some(stored) => {
                stored.set_parent(None);
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach_all(&mut self) {
        for child in self.map.iter() {
            child.set_parent(None);
        }
        self.map.clear_items();
    }

    fn push_owner(&self) {
        for child in self.map.iter() {
            child.set_parent(self.owner.clone());
        }
        debug!(children = self.map.len(), "pushed owner onto keyed children");
    }
}

impl<P, K, C> Deref for KeyedReadOnlyChildren<P, K, C> {
    type Target = ReadOnlyMap<K, C>;

    fn deref(&self) -> &ReadOnlyMap<K, C> {
        &self.map
    }
}

impl<P, K, C> Owned<P> for KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn owner(&self) -> Option<&P> {
        self.owner.as_ref()
    }

    fn set_owner(&mut self, owner: Option<P>) {
        self.owner = owner;
        self.push_owner();
    }
}

impl<P, K, C> Initializable<C> for KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn add_item(&mut self, child: C) -> Result<bool> {
        self.insert(child)
    }
}

impl<P, K, C> ReadBag<C> for KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    type Iter<'a> = hash_map::Values<'a, K, C> where Self: 'a, C: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, child: &C) -> bool {
        ReadBag::contains(&self.map, child)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.map.iter()
    }
}

impl<P, K, C> ElementCollection<C> for KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
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

impl<P, K, C> Restore for KeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn restore(&mut self) {
        self.push_owner();
    }
}

/// A [`KeyedReadOnlyChildren`] open to addition and removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "P: Serialize, K: Serialize, C: Serialize",
    deserialize = "P: Deserialize<'de>, K: Deserialize<'de> + Eq + Hash, C: Deserialize<'de>"
))]
pub struct KeyedChildren<P, K, C> {
    children: KeyedReadOnlyChildren<P, K, C>,
}

impl<P, K, C> Default for KeyedChildren<P, K, C> {
    fn default() -> Self {
        KeyedChildren {
            children: KeyedReadOnlyChildren::default(),
        }
    }
}

impl<P, K, C> KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K> + PartialEq,
{
    pub fn new(owner: Option<P>) -> Self {
        KeyedChildren {
            children: KeyedReadOnlyChildren::new(owner),
        }
    }

    pub fn with_children<I: IntoIterator<Item = C>>(owner: Option<P>, children: I) -> Result<Self> {
        Ok(KeyedChildren {
            children: KeyedReadOnlyChildren::with_children(owner, children)?,
        })
    }

    /// Attaches `child`; `Ok(false)` when its key is already taken.
    pub fn add(&mut self, child: C) -> Result<bool> {
        self.children.insert(child)
    }

    /// Attaches nothing when any of `children` has no key.
    pub fn add_all<I: IntoIterator<Item = C>>(&mut self, children: I) -> Result<()> {
        self.children.insert_all(children)
    }

    /// Detaches and removes `child` if it is the one stored under its key.
    ///
    /// A different child holding the same key is left alone and `Ok(false)`
    /// is returned.
    pub fn remove(&mut self, child: &C) -> Result<bool> {
        self.children.detach(child)
    }

    /// Detaches and removes whichever child holds `key`.
    pub fn remove_key(&mut self, key: &K) -> bool {
        self.children.detach_key(key)
    }

    pub fn clear(&mut self) {
        self.children.detach_all();
    }
}

impl<P, K, C> Deref for KeyedChildren<P, K, C> {
    type Target = KeyedReadOnlyChildren<P, K, C>;

    fn deref(&self) -> &KeyedReadOnlyChildren<P, K, C> {
        &self.children
    }
}

impl<P, K, C> Owned<P> for KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn owner(&self) -> Option<&P> {
        Owned::owner(&self.children)
    }

    fn set_owner(&mut self, owner: Option<P>) {
        self.children.set_owner(owner);
    }
}

impl<P, K, C> Initializable<C> for KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn add_item(&mut self, child: C) -> Result<bool> {
        self.children.insert(child)
    }
}

impl<P, K, C> ReadBag<C> for KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    type Iter<'a> = hash_map::Values<'a, K, C> where Self: 'a, C: 'a;

    fn len(&self) -> usize {
        self.children.map.len()
    }

    fn contains(&self, child: &C) -> bool {
        ReadBag::contains(&self.children, child)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.children.map.iter()
    }
}

impl<P, K, C> ElementCollection<C> for KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K> + PartialEq,
{
    fn is_read_only(&self) -> bool {
        false
    }

    fn insert(&mut self, child: C) -> Result<bool> {
        self.add(child)
    }

    fn remove_element(&mut self, child: &C) -> Result<bool> {
        self.remove(child)
    }

    fn clear_elements(&mut self) -> Result<()> {
        self.clear();
        Ok(())
    }
}

impl<P, K, C> Restore for KeyedChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn restore(&mut self) {
        self.children.restore();
    }
}
