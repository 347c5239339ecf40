use crate::container::contract::{Initializable, ReadBag};
use crate::container::{MultiDictionary, ReadOnlyMultiDictionary};
use crate::error::Result;
use std::hash::Hash;

/// Collects an iterator into a multi-dictionary grouped by a computed key.
///
/// The bucket type is picked by the target type, so annotate the binding:
///
/// ```
/// use content_model::{MultiDictionary, MultiDictionaryExt};
///
/// let by_len: MultiDictionary<usize, &str> =
///     ["a", "bb", "cc"].into_iter().into_multi_dictionary(|word| word.len())?;
/// assert_eq!(by_len.get(&2).len(), 2);
/// # Ok::<(), content_model::Error>(())
/// ```
pub trait MultiDictionaryExt: Iterator + Sized {
    fn into_multi_dictionary<K, B, F>(self, key_mapper: F) -> Result<MultiDictionary<K, Self::Item, B>>
    where
        K: Eq + Hash,
        B: ReadBag<Self::Item> + Initializable<Self::Item> + Default,
        F: FnMut(&Self::Item) -> K,
    {
        MultiDictionary::from_elements(self, key_mapper)
    }

    fn into_multi_dictionary_by<K, E, B, KF, VF>(
        self,
        key_mapper: KF,
        value_mapper: VF,
    ) -> Result<MultiDictionary<K, E, B>>
    where
        K: Eq + Hash,
        B: ReadBag<E> + Initializable<E> + Default,
        KF: FnMut(&Self::Item) -> K,
        VF: FnMut(Self::Item) -> E,
    {
        MultiDictionary::create(self, key_mapper, value_mapper)
    }

    fn into_read_only_multi_dictionary<K, B, F>(
        self,
        key_mapper: F,
    ) -> Result<ReadOnlyMultiDictionary<K, Self::Item, B>>
    where
        K: Eq + Hash,
        B: ReadBag<Self::Item> + Initializable<Self::Item> + Default,
        F: FnMut(&Self::Item) -> K,
    {
        ReadOnlyMultiDictionary::from_elements(self, key_mapper)
    }

    fn into_read_only_multi_dictionary_by<K, E, B, KF, VF>(
        self,
        key_mapper: KF,
        value_mapper: VF,
    ) -> Result<ReadOnlyMultiDictionary<K, E, B>>
    where
        K: Eq + Hash,
        B: ReadBag<E> + Initializable<E> + Default,
        KF: FnMut(&Self::Item) -> K,
        VF: FnMut(Self::Item) -> E,
    {
        ReadOnlyMultiDictionary::create(self, key_mapper, value_mapper)
    }
}

impl<I: Iterator> MultiDictionaryExt for I {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ReadOnlySequence;
    use pretty_assertions::assert_eq;

    #[test]
    fn groups_with_value_mapping() {
        let settings: MultiDictionary<char, u32, ReadOnlySequence<u32>> = [('a', 1), ('b', 2), ('a', 3)]
            .into_iter()
            .into_multi_dictionary_by(|pair| pair.0, |pair| pair.1)
            .unwrap();
        assert_eq!(settings.get(&'a').as_slice(), &[1, 3]);
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn read_only_variant() {
        let parity: ReadOnlyMultiDictionary<bool, u32> =
            (1..=5).into_read_only_multi_dictionary(|n| n % 2 == 0).unwrap();
        assert_eq!(parity.get(&true).len(), 2);
        assert_eq!(parity.get(&false).len(), 3);
    }
}
