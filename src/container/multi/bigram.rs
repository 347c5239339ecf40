use super::dictionary::MultiDictionary;
use crate::container::bag::ReadOnlyBag;
use crate::container::contract::{Initializable, ReadBag, Restore};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::hash_set;
use std::hash::Hash;
use tracing::{debug, instrument};

type Index<M, F, S> = OnceCell<Box<MultiDictionary<M, (F, S), ReadOnlyBiGramSet<F, S>>>>;

/// A set of ordered pairs, searchable by either member.
///
/// The by-first and by-second indices are built on the first lookup through
/// them and extended on every later insertion. An index that is never looked
/// up is never built. Pairs cannot be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "F: Serialize, S: Serialize",
    deserialize = "F: Deserialize<'de> + Eq + Hash, S: Deserialize<'de> + Eq + Hash"
))]
pub struct ReadOnlyBiGramSet<F, S> {
    pairs: ReadOnlyBag<(F, S)>,
    #[serde(skip)]
    by_first: Index<F, F, S>,
    #[serde(skip)]
    by_second: Index<S, F, S>,
}

/// A bi-gram set over a single member type.
pub type UniformBiGramSet<T> = ReadOnlyBiGramSet<T, T>;

impl<F, S> Default for ReadOnlyBiGramSet<F, S> {
    fn default() -> Self {
        ReadOnlyBiGramSet {
            pairs: ReadOnlyBag::default(),
            by_first: OnceCell::new(),
            by_second: OnceCell::new(),
        }
    }
}

impl<F, S> ReadOnlyBiGramSet<F, S>
where
    F: Clone + Eq + Hash,
    S: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, pair: &(F, S)) -> bool {
        self.pairs.contains(pair)
    }

    pub fn contains_pair(&self, first: &F, second: &S) -> bool {
        self.pairs.contains(&(first.clone(), second.clone()))
    }

    pub fn iter(&self) -> hash_set::Iter<'_, (F, S)> {
        self.pairs.iter()
    }

    pub fn snapshot(&self) -> Vec<(F, S)> {
        self.pairs.snapshot()
    }

    /// Pairs whose first member is `first`.
    pub fn get_by_first(&self, first: &F) -> &ReadOnlyBiGramSet<F, S> {
        self.by_first
            .get_or_init(|| self.build_index(|(first, _)| first.clone()))
            .get(first)
    }

    /// Pairs whose second member is `second`.
    pub fn get_by_second(&self, second: &S) -> &ReadOnlyBiGramSet<F, S> {
        self.by_second
            .get_or_init(|| self.build_index(|(_, second)| second.clone()))
            .get(second)
    }

    pub fn has_first_index(&self) -> bool {
        self.by_first.get().is_some()
    }

    pub fn has_second_index(&self) -> bool {
        self.by_second.get().is_some()
    }

    #[instrument(level = "debug", skip_all, fields(pairs = self.pairs.len()))]
    fn build_index<M, KF>(&self, member: KF) -> Box<MultiDictionary<M, (F, S), Self>>
    where
        M: Eq + Hash,
        KF: Fn(&(F, S)) -> M,
    {
        let mut index = MultiDictionary::new();
        for pair in self.pairs.iter() {
            index.insert_with(member(pair), |bucket: &mut Self| bucket.insert(pair.clone()));
        }
        debug!(keys = index.keys().len(), "built bi-gram index");
        Box::new(index)
    }

    pub(crate) fn insert(&mut self, pair: (F, S)) -> bool {
        if !self.pairs.insert(pair.clone()) {
            return false;
        }
        if let Some(index) = self.by_first.get_mut() {
            let bucket_pair = pair.clone();
            index.insert_with(pair.0.clone(), |bucket| bucket.insert(bucket_pair));
        }
        if let Some(index) = self.by_second.get_mut() {
            let key = pair.1.clone();
            index.insert_with(key, |bucket| bucket.insert(pair));
        }
        true
    }
}

impl<F, S> FromIterator<(F, S)> for ReadOnlyBiGramSet<F, S>
where
    F: Clone + Eq + Hash,
    S: Clone + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (F, S)>>(iter: I) -> Self {
        ReadOnlyBiGramSet {
            pairs: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl<'a, F, S> IntoIterator for &'a ReadOnlyBiGramSet<F, S> {
    type Item = &'a (F, S);
    type IntoIter = hash_set::Iter<'a, (F, S)>;

    fn into_iter(self) -> Self::IntoIter {
        (&self.pairs).into_iter()
    }
}

impl<F, S> PartialEq for ReadOnlyBiGramSet<F, S>
where
    F: Eq + Hash,
    S: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl<F, S> Initializable<(F, S)> for ReadOnlyBiGramSet<F, S>
where
    F: Clone + Eq + Hash,
    S: Clone + Eq + Hash,
{
    fn add_item(&mut self, pair: (F, S)) -> Result<bool> {
        Ok(self.insert(pair))
    }
}

impl<F, S> ReadBag<(F, S)> for ReadOnlyBiGramSet<F, S>
where
    F: Clone + Eq + Hash,
    S: Clone + Eq + Hash,
{
    type Iter<'a> = hash_set::Iter<'a, (F, S)> where Self: 'a, (F, S): 'a;

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn contains(&self, pair: &(F, S)) -> bool {
        self.pairs.contains(pair)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.pairs.iter()
    }
}

impl<F, S> Restore for ReadOnlyBiGramSet<F, S> {
    fn restore(&mut self) {
        self.by_first.take();
        self.by_second.take();
    }
}
