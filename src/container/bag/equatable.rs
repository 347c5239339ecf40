use super::ReadOnlyBag;
use crate::container::contract::{Initializable, ReadBag, Restore};
use crate::container::hash_code;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_set;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use tracing::debug;

/// A bag with value equality, usable as a map key or set member.
///
/// Two bags are equal when they hold the same set of elements, in any order.
/// The hash code is the wrapping sum of the element hash codes and is kept
/// in a field that is not persisted; call [`Restore::restore`] after
/// deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "E: Serialize",
    deserialize = "E: Deserialize<'de> + Eq + Hash"
))]
pub struct EquatableBag<E> {
    bag: ReadOnlyBag<E>,
    #[serde(skip)]
    hash_code: u64,
}

impl<E> Default for EquatableBag<E> {
    fn default() -> Self {
        EquatableBag {
            bag: ReadOnlyBag::default(),
            hash_code: 0,
        }
    }
}

impl<E: Eq + Hash> EquatableBag<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hash_code(&self) -> u64 {
        self.hash_code
    }

    fn calculate_hash_code(&self) -> u64 {
        self.bag
            .iter()
            .fold(0u64, |sum, element| sum.wrapping_add(hash_code(element)))
    }
}

impl<E: Eq + Hash> PartialEq for EquatableBag<E> {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code == other.hash_code && self.bag == other.bag
    }
}

impl<E: Eq + Hash> Eq for EquatableBag<E> {}

impl<E> Hash for EquatableBag<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code);
    }
}

impl<E> Deref for EquatableBag<E> {
    type Target = ReadOnlyBag<E>;

    fn deref(&self) -> &ReadOnlyBag<E> {
        &self.bag
    }
}

impl<E: Eq + Hash> FromIterator<E> for EquatableBag<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut bag = EquatableBag {
            bag: iter.into_iter().collect(),
            hash_code: 0,
        };
        bag.hash_code = bag.calculate_hash_code();
        bag
    }
}

impl<E: Eq + Hash> Initializable<E> for EquatableBag<E> {
    fn add_item(&mut self, element: E) -> Result<bool> {
        let element_hash = hash_code(&element);
        if self.bag.insert(element) {
            self.hash_code = self.hash_code.wrapping_add(element_hash);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl<E: Eq + Hash> ReadBag<E> for EquatableBag<E> {
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

impl<E: Eq + Hash> Restore for EquatableBag<E> {
    fn restore(&mut self) {
        self.hash_code = self.calculate_hash_code();
        debug!(hash_code = self.hash_code, "recomputed bag hash code");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn order_does_not_matter() {
        let a: EquatableBag<&str> = ["x", "y", "z"].into_iter().collect();
        let b: EquatableBag<&str> = ["z", "x", "y"].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn different_contents_differ() {
        let a: EquatableBag<i32> = [1, 2].into_iter().collect();
        let b: EquatableBag<i32> = [1, 3].into_iter().collect();
        assert_ne!(a, b);
    }

    #[test]
    fn add_keeps_hash_in_step() {
        let mut grown: EquatableBag<i32> = [1, 2].into_iter().collect();
        assert!(grown.add_item(3).unwrap());
        assert!(!grown.add_item(3).unwrap());

        let built: EquatableBag<i32> = [3, 2, 1].into_iter().collect();
        assert_eq!(grown.hash_code(), built.hash_code());
        assert_eq!(grown, built);
    }

    #[test]
    fn usable_as_map_key() {
        let mut memo = HashMap::new();
        let args: EquatableBag<i32> = [4, 5].into_iter().collect();
        memo.insert(args, "cached");

        let lookup: EquatableBag<i32> = [5, 4].into_iter().collect();
        assert_eq!(memo.get(&lookup), Some(&"cached"));
    }
}
