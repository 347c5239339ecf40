use crate::container::contract::{ElementCollection, Initializable, ReadBag, ReadSequence, Restore};
use crate::error::{Error, Result};
use function_name::named;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::ops::Deref;
use std::rc::Rc;
use std::slice;

/// An ordered collection with positional access, filled at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct ReadOnlySequence<T> {
    list: Vec<T>,
    #[serde(skip)]
    cached_array: OnceCell<Rc<[T]>>,
}

impl<T> Default for ReadOnlySequence<T> {
    fn default() -> Self {
        ReadOnlySequence {
            list: Vec::new(),
            cached_array: OnceCell::new(),
        }
    }
}

impl<T> ReadOnlySequence<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[named]
    pub fn get(&self, index: usize) -> Result<&T> {
        self.list.get(index).ok_or_else(|| {
            tracing::trace!(operation = function_name!(), index, "index out of range");
            Error::IndexOutOfRange {
                index,
                len: self.list.len(),
            }
        })
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.list.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.list
    }

    /// Cached snapshot of the items, shared until the next append.
    pub fn to_array(&self) -> Rc<[T]>
    where
        T: Clone,
    {
        self.cached_array
            .get_or_init(|| Rc::from(self.list.as_slice()))
            .clone()
    }

    /// Fresh, uncached copy of the items.
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.list.clone()
    }

    pub(crate) fn push(&mut self, item: T) {
        self.cached_array.take();
        self.list.push(item);
    }
}

impl<T> From<Vec<T>> for ReadOnlySequence<T> {
    fn from(list: Vec<T>) -> Self {
        ReadOnlySequence {
            list,
            cached_array: OnceCell::new(),
        }
    }
}

impl<T> FromIterator<T> for ReadOnlySequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a ReadOnlySequence<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl<T: PartialEq> PartialEq for ReadOnlySequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl<T> Initializable<T> for ReadOnlySequence<T> {
    fn add_item(&mut self, element: T) -> Result<bool> {
        self.push(element);
        Ok(true)
    }
}

impl<T: PartialEq> ReadBag<T> for ReadOnlySequence<T> {
    type Iter<'a> = slice::Iter<'a, T> where Self: 'a, T: 'a;

    fn len(&self) -> usize {
        self.list.len()
    }

    fn contains(&self, element: &T) -> bool {
        self.list.contains(element)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.list.iter()
    }
}

impl<T: PartialEq> ReadSequence<T> for ReadOnlySequence<T> {
    fn get(&self, index: usize) -> Result<&T> {
        ReadOnlySequence::get(self, index)
    }

    fn to_array(&self) -> Rc<[T]>
    where
        T: Clone,
    {
        ReadOnlySequence::to_array(self)
    }
}

impl<T> ElementCollection<T> for ReadOnlySequence<T> {
    fn is_read_only(&self) -> bool {
        true
    }

    fn insert(&mut self, element: T) -> Result<bool> {
        self.add_item(element)
    }

    #[named]
    fn remove_element(&mut self, _element: &T) -> Result<bool> {
        Err(Error::read_only(function_name!()))
    }

    #[named]
    fn clear_elements(&mut self) -> Result<()> {
        Err(Error::read_only(function_name!()))
    }
}

impl<T> Restore for ReadOnlySequence<T> {
    fn restore(&mut self) {
        self.cached_array.take();
    }
}

/// An append-only [`ReadOnlySequence`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence<T> {
    sequence: ReadOnlySequence<T>,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Sequence {
            sequence: ReadOnlySequence::default(),
        }
    }
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item, invalidating the cached array.
    pub fn push(&mut self, item: T) {
        self.sequence.push(item);
    }
}

impl<T> Deref for Sequence<T> {
    type Target = ReadOnlySequence<T>;

    fn deref(&self) -> &ReadOnlySequence<T> {
        &self.sequence
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sequence {
            sequence: iter.into_iter().collect(),
        }
    }
}

impl<T> Initializable<T> for Sequence<T> {
    fn add_item(&mut self, element: T) -> Result<bool> {
        self.push(element);
        Ok(true)
    }
}

impl<T: PartialEq> ReadBag<T> for Sequence<T> {
    type Iter<'a> = slice::Iter<'a, T> where Self: 'a, T: 'a;

    fn len(&self) -> usize {
        self.sequence.len()
    }

    fn contains(&self, element: &T) -> bool {
        self.sequence.as_slice().contains(element)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.sequence.iter()
    }
}

impl<T: PartialEq> ReadSequence<T> for Sequence<T> {
    fn get(&self, index: usize) -> Result<&T> {
        self.sequence.get(index)
    }

    fn to_array(&self) -> Rc<[T]>
    where
        T: Clone,
    {
        self.sequence.to_array()
    }
}

impl<T> ElementCollection<T> for Sequence<T> {
    fn is_read_only(&self) -> bool {
        false
    }

    fn insert(&mut self, element: T) -> Result<bool> {
        self.push(element);
        Ok(true)
    }

    // Append-only: no removal is defined for sequences.
    #[named]
    fn remove_element(&mut self, _element: &T) -> Result<bool> {
        Err(Error::read_only(function_name!()))
    }

    #[named]
    fn clear_elements(&mut self) -> Result<()> {
        Err(Error::read_only(function_name!()))
    }
}

impl<T> Restore for Sequence<T> {
    fn restore(&mut self) {
        self.sequence.restore();
    }
}
