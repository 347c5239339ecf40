use crate::container::bag::ReadOnlyBag;
use crate::container::contract::{Initializable, ReadBag, Restore};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, Entry, HashMap};
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::Deref;
use tracing::{debug, trace};

/// One-to-many association from keys to buckets of elements.
///
/// `B` is the bucket type, any buildable read contract such as
/// [`ReadOnlyBag`] (the default), [`ReadOnlySequence`] or a
/// [`ReadOnlyBiGramSet`]. Buckets are created on the first successful add
/// under their key.
///
/// The bucket type doubles as the read contract handed out by
/// [`get`](Self::get) and as the implementation the dictionary builds, so
/// `B` must be both [`ReadBag`] and [`Initializable`]. There is no separate
/// parameter for a narrower view of the bucket.
///
/// [`len`](Self::len) counts elements across all buckets, not keys. Looking
/// up an absent key yields the same empty bucket every time.
///
/// [`ReadOnlySequence`]: crate::container::ReadOnlySequence
/// [`ReadOnlyBiGramSet`]: crate::container::ReadOnlyBiGramSet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, B: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, B: Deserialize<'de> + Default"
))]
pub struct ReadOnlyMultiDictionary<K, E, B = ReadOnlyBag<E>> {
    buckets: HashMap<K, B>,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    empty: B,
    #[serde(skip)]
    marker: PhantomData<fn() -> E>,
}

impl<K, E, B: Default> Default for ReadOnlyMultiDictionary<K, E, B> {
    fn default() -> Self {
        ReadOnlyMultiDictionary {
            buckets: HashMap::new(),
            count: 0,
            empty: B::default(),
            marker: PhantomData,
        }
    }
}

impl<K, E, B> ReadOnlyMultiDictionary<K, E, B> {
    /// Total number of elements in all buckets.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, B> {
        self.buckets.keys()
    }

    /// Iterates over `(key, bucket)` entries.
    pub fn iter(&self) -> hash_map::Iter<'_, K, B> {
        self.buckets.iter()
    }

    pub(crate) fn clear_items(&mut self) {
        self.buckets.clear();
        self.count = 0;
    }
}

impl<K: Eq + Hash, E, B> ReadOnlyMultiDictionary<K, E, B> {
    /// The bucket under `key`, or the shared empty bucket.
    pub fn get(&self, key: &K) -> &B {
        self.buckets.get(key).unwrap_or(&self.empty)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.buckets.contains_key(key)
    }

    /// Fresh copy of the entries.
    pub fn snapshot(&self) -> Vec<(K, B)>
    where
        K: Clone,
        B: Clone,
    {
        self.buckets
            .iter()
            .map(|(key, bucket)| (key.clone(), bucket.clone()))
            .collect()
    }
}

impl<K, E, B> ReadOnlyMultiDictionary<K, E, B>
where
    K: Eq + Hash,
    B: ReadBag<E> + Initializable<E> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(keys_capacity: usize) -> Self {
        ReadOnlyMultiDictionary {
            buckets: HashMap::with_capacity(keys_capacity),
            ..Self::default()
        }
    }

    pub fn from_pairs<I: IntoIterator<Item = (K, E)>>(pairs: I) -> Result<Self> {
        let mut dictionary = Self::new();
        for pair in pairs {
            dictionary.add_item(pair)?;
        }
        Ok(dictionary)
    }

    /// Adds every element of every `(key, elements)` entry.
    pub fn from_buckets<I, C>(buckets: I) -> Result<Self>
    where
        K: Clone,
        I: IntoIterator<Item = (K, C)>,
        C: IntoIterator<Item = E>,
    {
        let buckets = buckets.into_iter();
        let mut dictionary = Self::with_capacity(buckets.size_hint().0);
        for (key, elements) in buckets {
            dictionary.add_all_under(key, elements)?;
        }
        Ok(dictionary)
    }

    /// Groups `elements` under the key computed by `key_mapper`.
    pub fn from_elements<I, F>(elements: I, mut key_mapper: F) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        F: FnMut(&E) -> K,
    {
        let mut dictionary = Self::new();
        for element in elements {
            let key = key_mapper(&element);
            dictionary.add_item((key, element))?;
        }
        Ok(dictionary)
    }

    /// Maps each source item to one `(key, element)` entry.
    pub fn create<T, I, KF, VF>(source: I, mut key_mapper: KF, mut value_mapper: VF) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> E,
    {
        let mut dictionary = Self::new();
        for item in source {
            let key = key_mapper(&item);
            dictionary.add_item((key, value_mapper(item)))?;
        }
        Ok(dictionary)
    }

    /// Maps each master item to a key and a list of detail elements.
    pub fn from_master_detail<T, I, C, KF, DF>(
        source: I,
        mut key_mapper: KF,
        mut elements_mapper: DF,
    ) -> Result<Self>
    where
        K: Clone,
        I: IntoIterator<Item = T>,
        C: IntoIterator<Item = E>,
        KF: FnMut(&T) -> K,
        DF: FnMut(T) -> C,
    {
        let source = source.into_iter();
        let mut dictionary = Self::with_capacity(source.size_hint().0);
        for master in source {
            let key = key_mapper(&master);
            dictionary.add_all_under(key, elements_mapper(master))?;
        }
        Ok(dictionary)
    }

    fn add_all_under<C: IntoIterator<Item = E>>(&mut self, key: K, elements: C) -> Result<()>
    where
        K: Clone,
    {
        for element in elements {
            self.add_item((key.clone(), element))?;
        }
        Ok(())
    }

    /// Adds through an infallible bucket operation.
    pub(crate) fn insert_with<F>(&mut self, key: K, add: F) -> bool
    where
        F: FnOnce(&mut B) -> bool,
    {
        let added = match self.buckets.entry(key) {
            Entry::Occupied(mut slot) => add(slot.get_mut()),
            Entry::Vacant(slot) => {
                let mut bucket = B::default();
                let added = add(&mut bucket);
                if added {
                    slot.insert(bucket);
                }
                added
            }
        };
        self.record(added)
    }

    fn record(&mut self, added: bool) -> bool {
        if added {
            self.count += 1;
        } else {
            trace!("bucket rejected element");
        }
        added
    }
}

impl<K, E, B> Initializable<(K, E)> for ReadOnlyMultiDictionary<K, E, B>
where
    K: Eq + Hash,
    B: ReadBag<E> + Initializable<E> + Default,
{
    fn add_item(&mut self, (key, element): (K, E)) -> Result<bool> {
        let added = match self.buckets.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().add_item(element)?,
            Entry::Vacant(slot) => {
                let mut bucket = B::default();
                let added = bucket.add_item(element)?;
                if added {
                    slot.insert(bucket);
                }
                added
            }
        };
        Ok(self.record(added))
    }
}

impl<'a, K, E, B> IntoIterator for &'a ReadOnlyMultiDictionary<K, E, B> {
    type Item = (&'a K, &'a B);
    type IntoIter = hash_map::Iter<'a, K, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

impl<K, E, B> Restore for ReadOnlyMultiDictionary<K, E, B>
where
    B: ReadBag<E> + Restore,
{
    fn restore(&mut self) {
        self.count = 0;
        for bucket in self.buckets.values_mut() {
            bucket.restore();
            self.count += bucket.len();
        }
        debug!(
            keys = self.buckets.len(),
            count = self.count,
            "recounted multi-dictionary"
        );
    }
}

/// A [`ReadOnlyMultiDictionary`] with public `add` and `clear`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize, B: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, B: Deserialize<'de> + Default"
))]
pub struct MultiDictionary<K, E, B = ReadOnlyBag<E>> {
    dictionary: ReadOnlyMultiDictionary<K, E, B>,
}

impl<K, E, B: Default> Default for MultiDictionary<K, E, B> {
    fn default() -> Self {
        MultiDictionary {
            dictionary: ReadOnlyMultiDictionary::default(),
        }
    }
}

impl<K, E, B> From<ReadOnlyMultiDictionary<K, E, B>> for MultiDictionary<K, E, B> {
    fn from(dictionary: ReadOnlyMultiDictionary<K, E, B>) -> Self {
        MultiDictionary { dictionary }
    }
}

impl<K, E, B> MultiDictionary<K, E, B>
where
    K: Eq + Hash,
    B: ReadBag<E> + Initializable<E> + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(keys_capacity: usize) -> Self {
        ReadOnlyMultiDictionary::with_capacity(keys_capacity).into()
    }

    pub fn from_pairs<I: IntoIterator<Item = (K, E)>>(pairs: I) -> Result<Self> {
        ReadOnlyMultiDictionary::from_pairs(pairs).map(Self::from)
    }

    pub fn from_buckets<I, C>(buckets: I) -> Result<Self>
    where
        K: Clone,
        I: IntoIterator<Item = (K, C)>,
        C: IntoIterator<Item = E>,
    {
        ReadOnlyMultiDictionary::from_buckets(buckets).map(Self::from)
    }

    pub fn from_elements<I, F>(elements: I, key_mapper: F) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        F: FnMut(&E) -> K,
    {
        ReadOnlyMultiDictionary::from_elements(elements, key_mapper).map(Self::from)
    }

    pub fn create<T, I, KF, VF>(source: I, key_mapper: KF, value_mapper: VF) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> E,
    {
        ReadOnlyMultiDictionary::create(source, key_mapper, value_mapper).map(Self::from)
    }

    pub fn from_master_detail<T, I, C, KF, DF>(
        source: I,
        key_mapper: KF,
        elements_mapper: DF,
    ) -> Result<Self>
    where
        K: Clone,
        I: IntoIterator<Item = T>,
        C: IntoIterator<Item = E>,
        KF: FnMut(&T) -> K,
        DF: FnMut(T) -> C,
    {
        ReadOnlyMultiDictionary::from_master_detail(source, key_mapper, elements_mapper)
            .map(Self::from)
    }

    /// Returns `Ok(false)` when the bucket under `key` rejects `element`.
    pub fn add(&mut self, key: K, element: E) -> Result<bool> {
        self.dictionary.add_item((key, element))
    }

    pub fn clear(&mut self) {
        self.dictionary.clear_items();
    }

    pub(crate) fn insert_with<F>(&mut self, key: K, add: F) -> bool
    where
        F: FnOnce(&mut B) -> bool,
    {
        self.dictionary.insert_with(key, add)
    }
}

impl<K, E, B> Deref for MultiDictionary<K, E, B> {
    type Target = ReadOnlyMultiDictionary<K, E, B>;

    fn deref(&self) -> &ReadOnlyMultiDictionary<K, E, B> {
        &self.dictionary
    }
}

impl<K, E, B> Initializable<(K, E)> for MultiDictionary<K, E, B>
where
    K: Eq + Hash,
    B: ReadBag<E> + Initializable<E> + Default,
{
    fn add_item(&mut self, pair: (K, E)) -> Result<bool> {
        self.dictionary.add_item(pair)
    }
}

impl<K: Eq + Hash, E: Eq + Hash> FromIterator<(K, E)> for MultiDictionary<K, E> {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut dictionary = Self::new();
        for (key, element) in iter {
            dictionary.insert_with(key, |bucket| bucket.insert(element));
        }
        dictionary
    }
}

impl<K, E, B> Restore for MultiDictionary<K, E, B>
where
    B: ReadBag<E> + Restore,
{
    fn restore(&mut self) {
        self.dictionary.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::sequence::ReadOnlySequence;
    use crate::container::Keyed;
    use crate::container::ReadOnlyMap;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn sorted<'a>(bucket: impl IntoIterator<Item = &'a i32>) -> Vec<i32> {
        let mut items: Vec<i32> = bucket.into_iter().copied().collect();
        items.sort();
        items
    }

    #[test]
    fn count_is_total_of_buckets() {
        let dictionary: MultiDictionary<&str, i32> =
            MultiDictionary::from_pairs([("a", 1), ("a", 2), ("b", 3)]).unwrap();
        assert_eq!(dictionary.len(), 3);
        assert_eq!(
            dictionary.len(),
            dictionary.iter().map(|(_, bucket)| bucket.len()).sum::<usize>()
        );
        assert_eq!(sorted(dictionary.get(&"a")), vec![1, 2]);
    }

    #[test]
    fn duplicate_in_bag_bucket_does_not_count() {
        let mut dictionary: MultiDictionary<&str, i32> = MultiDictionary::new();
        assert_eq!(dictionary.add("a", 1), Ok(true));
        assert_eq!(dictionary.add("a", 1), Ok(false));
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn absent_key_yields_shared_empty_bucket() {
        let dictionary: MultiDictionary<&str, i32> = MultiDictionary::from_pairs([("a", 1)]).unwrap();
        let first = dictionary.get(&"x");
        let second = dictionary.get(&"y");
        assert!(first.is_empty());
        assert!(std::ptr::eq(first, second));
        assert!(!dictionary.contains_key(&"x"));
    }

    #[test]
    fn sequence_buckets_keep_duplicates_in_order() {
        let dictionary: MultiDictionary<char, i32, ReadOnlySequence<i32>> =
            MultiDictionary::from_elements([12, 31, 12, 15], |n| if n % 2 == 0 { 'e' } else { 'o' })
                .unwrap();
        assert_eq!(dictionary.get(&'e').as_slice(), &[12, 12]);
        assert_eq!(dictionary.get(&'o').as_slice(), &[31, 15]);
        assert_eq!(dictionary.len(), 4);
    }

    #[test]
    fn master_detail_and_create() {
        let orders = vec![("ann", vec![1, 2]), ("bob", vec![3]), ("ann", vec![4])];
        let by_customer: MultiDictionary<&str, i32> =
            MultiDictionary::from_master_detail(orders.clone(), |order| order.0, |order| order.1)
                .unwrap();
        assert_eq!(sorted(by_customer.get(&"ann")), vec![1, 2, 4]);

        let lengths: MultiDictionary<usize, &str> =
            MultiDictionary::create(["ab", "cd", "xyz"], |word| word.len(), |word| word).unwrap();
        assert_eq!(lengths.get(&2).len(), 2);
        assert_eq!(lengths.get(&3).len(), 1);

        let from_buckets: MultiDictionary<&str, i32> =
            MultiDictionary::from_buckets(orders).unwrap();
        assert_eq!(from_buckets.len(), 4);
    }

    #[test]
    fn failing_bucket_leaves_no_trace() {
        #[derive(Debug, Clone, PartialEq)]
        struct Tag(Option<&'static str>);

        impl Keyed<&'static str> for Tag {
            fn key(&self) -> Option<&'static str> {
                self.0
            }
        }

        let mut dictionary: MultiDictionary<u8, Tag, ReadOnlyMap<&str, Tag>> =
            MultiDictionary::new();
        assert!(matches!(
            dictionary.add(1, Tag(None)),
            Err(Error::NullArgument { .. })
        ));
        assert!(!dictionary.contains_key(&1));
        assert_eq!(dictionary.len(), 0);
    }

    #[test]
    fn clear_resets_count() {
        let mut dictionary: MultiDictionary<u8, u8> = [(1, 1), (1, 2), (2, 1)].into_iter().collect();
        assert_eq!(dictionary.len(), 3);
        dictionary.clear();
        assert!(dictionary.is_empty());
        assert_eq!(dictionary.keys().count(), 0);
    }
}
