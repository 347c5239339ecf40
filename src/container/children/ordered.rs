use crate::container::contract::{
    all_keyed, Child, ElementCollection, Initializable, Keyed, Owned, ReadBag, ReadSequence,
    Restore,
};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::hash_map::{Entry, HashMap};
use std::hash::Hash;
use std::rc::Rc;
use std::slice;
use tracing::{debug, trace, warn};

/// Keyed children that also keep their insertion order.
///
/// Each child gets a permanent position when inserted. There is no removal
/// or reordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize, C: Serialize",
    deserialize = "P: Deserialize<'de>, C: Deserialize<'de>"
))]
pub struct OrderedKeyedReadOnlyChildren<P, K, C> {
    owner: Option<P>,
    items: Vec<C>,
    #[serde(skip)]
    positions: HashMap<K, usize>,
    #[serde(skip)]
    cached_array: OnceCell<Rc<[C]>>,
}

impl<P, K, C> Default for OrderedKeyedReadOnlyChildren<P, K, C> {
    fn default() -> Self {
        OrderedKeyedReadOnlyChildren {
            owner: None,
            items: Vec::new(),
            positions: HashMap::new(),
            cached_array: OnceCell::new(),
        }
    }
}

impl<P, K, C> OrderedKeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    pub fn new(owner: Option<P>) -> Self {
        OrderedKeyedReadOnlyChildren {
            owner,
            ..Self::default()
        }
    }

    pub fn with_children<I: IntoIterator<Item = C>>(owner: Option<P>, children: I) -> Result<Self> {
        let mut collection = Self::new(owner);
        for child in all_keyed::<K, _, _>(children)? {
            collection.insert(child)?;
        }
        Ok(collection)
    }

    pub fn owner(&self) -> Option<&P> {
        self.owner.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    /// Fails with [`Error::KeyNotFound`] when no child has `key`.
    pub fn get_by_key(&self, key: &K) -> Result<&C> {
        self.try_get_by_key(key).ok_or(Error::KeyNotFound)
    }

    pub fn try_get_by_key(&self, key: &K) -> Option<&C> {
        self.positions
            .get(key)
            .and_then(|&position| self.items.get(position))
    }

    /// The child at insertion position `index`.
    pub fn get(&self, index: usize) -> Result<&C> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, C> {
        self.items.iter()
    }

    pub fn to_array(&self) -> Rc<[C]>
    where
        C: Clone,
    {
        self.cached_array
            .get_or_init(|| Rc::from(self.items.as_slice()))
            .clone()
    }

    pub fn snapshot(&self) -> Vec<C>
    where
        C: Clone,
    {
        self.items.clone()
    }

    #[named]
    pub(crate) fn insert(&mut self, child: C) -> Result<bool> {
        let key = child
            .key()
            .ok_or_else(|| Error::null(function_name!(), "child.key"))?;
        match self.positions.entry(key) {
            Entry::Occupied(_) => {
                trace!("key already taken by another child");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                slot.insert(self.items.len());
                child.set_parent(self.owner.clone());
                self.items.push(child);
                self.cached_array.take();
                Ok(true)
            }
        }
    }

    fn push_owner(&self) {
        for child in &self.items {
            child.set_parent(self.owner.clone());
        }
        debug!(children = self.items.len(), "pushed owner onto ordered children");
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (position, child) in self.items.iter().enumerate() {
            match child.key() {
                Some(key) => {
                    self.positions.entry(key).or_insert(position);
                }
                None => warn!(position, "restored child has no key"),
            }
        }
    }
}

impl<'a, P, K, C> IntoIterator for &'a OrderedKeyedReadOnlyChildren<P, K, C> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<P, K, C> Owned<P> for OrderedKeyedReadOnlyChildren<P, K, C>
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

impl<P, K, C> Initializable<C> for OrderedKeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn add_item(&mut self, child: C) -> Result<bool> {
        self.insert(child)
    }
}

/// Membership is decided by key.
impl<P, K, C> ReadBag<C> for OrderedKeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    type Iter<'a> = slice::Iter<'a, C> where Self: 'a, C: 'a;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn contains(&self, child: &C) -> bool {
        child
            .key()
            .map_or(false, |key| self.positions.contains_key(&key))
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items.iter()
    }
}

impl<P, K, C> ReadSequence<C> for OrderedKeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn get(&self, index: usize) -> Result<&C> {
        OrderedKeyedReadOnlyChildren::get(self, index)
    }

    fn to_array(&self) -> Rc<[C]>
    where
        C: Clone,
    {
        OrderedKeyedReadOnlyChildren::to_array(self)
    }
}

impl<P, K, C> ElementCollection<C> for OrderedKeyedReadOnlyChildren<P, K, C>
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

/// Rebuilds the key index and reattaches every child to the owner.
impl<P, K, C> Restore for OrderedKeyedReadOnlyChildren<P, K, C>
where
    P: Clone,
    K: Eq + Hash,
    C: Child<P> + Keyed<K>,
{
    fn restore(&mut self) {
        self.cached_array.take();
        self.reindex();
        self.push_owner();
    }
}
