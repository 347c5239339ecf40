use super::ReadOnlySequence;
use crate::container::contract::{Initializable, ReadBag, ReadSequence, Restore};
use crate::container::hash_code;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;
use std::slice;

/// Number of leading items contributing to the hash code.
const HASHED_PREFIX_LEN: usize = 6;

/// A sequence with ordered value equality, usable as a map key.
///
/// The hash code only covers the first few items, so hashing a long sequence
/// stays cheap. Equality compares the hash codes, the lengths and then the
/// items pairwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct EquatableSequence<T> {
    sequence: ReadOnlySequence<T>,
    #[serde(skip)]
    hash_code: u64,
}

impl<T: Hash> EquatableSequence<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut sequence = EquatableSequence {
            sequence: ReadOnlySequence::from(items),
            hash_code: 0,
        };
        sequence.hash_code = sequence.calculate_hash_code();
        sequence
    }

    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }

    fn calculate_hash_code(&self) -> u64 {
        self.sequence
            .iter()
            .take(HASHED_PREFIX_LEN)
            .fold(17u64, |acc, item| {
                acc.wrapping_mul(23).wrapping_add(hash_code(item))
            })
    }
}

impl<T: Hash> Default for EquatableSequence<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Hash> FromIterator<T> for EquatableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: PartialEq> PartialEq for EquatableSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code
            && self.sequence.len() == other.sequence.len()
            && self
                .sequence
                .iter()
                .zip(other.sequence.iter())
                .all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for EquatableSequence<T> {}

impl<T> Hash for EquatableSequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code);
    }
}

impl<T> Deref for EquatableSequence<T> {
    type Target = ReadOnlySequence<T>;

    fn deref(&self) -> &ReadOnlySequence<T> {
        &self.sequence
    }
}

impl<T: Hash> Initializable<T> for EquatableSequence<T> {
    fn add_item(&mut self, element: T) -> Result<bool> {
        self.sequence.push(element);
        if self.sequence.len() <= HASHED_PREFIX_LEN {
            self.hash_code = self.calculate_hash_code();
        }
        Ok(true)
    }
}

impl<T: PartialEq> ReadBag<T> for EquatableSequence<T> {
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

impl<T: PartialEq> ReadSequence<T> for EquatableSequence<T> {
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

impl<T: Hash> Restore for EquatableSequence<T> {
    fn restore(&mut self) {
        self.sequence.restore();
        self.hash_code = self.calculate_hash_code();
    }
}
