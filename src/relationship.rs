//! Many-to-many association from a flat list of pairs.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::{debug, instrument};

/// Calls `a_side` once per distinct `A` with the set of its `B`s, and
/// `b_side` once per distinct `B` with the set of its `A`s.
///
/// Callback order is unspecified.
pub fn act_many_to_many<A, B, I, FA, FB>(tuples: I, a_side: FA, b_side: FB)
where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
    I: IntoIterator<Item = (A, B)>,
    FA: FnMut(A, HashSet<B>),
    FB: FnMut(B, HashSet<A>),
{
    act_many_to_many_seeded(Vec::new(), Vec::new(), tuples, a_side, b_side);
}

/// Like [`act_many_to_many`], but every member of `all_as` and `all_bs` gets
/// a callback, with an empty set when it appears in no pair.
#[instrument(level = "debug", skip_all)]
pub fn act_many_to_many_seeded<A, B, IA, IB, I, FA, FB>(
    all_as: IA,
    all_bs: IB,
    tuples: I,
    mut a_side: FA,
    mut b_side: FB,
) where
    A: Eq + Hash + Clone,
    B: Eq + Hash + Clone,
    IA: IntoIterator<Item = A>,
    IB: IntoIterator<Item = B>,
    I: IntoIterator<Item = (A, B)>,
    FA: FnMut(A, HashSet<B>),
    FB: FnMut(B, HashSet<A>),
{
    let mut a_map: HashMap<A, HashSet<B>> =
        all_as.into_iter().map(|a| (a, HashSet::new())).collect();
    let mut b_map: HashMap<B, HashSet<A>> =
        all_bs.into_iter().map(|b| (b, HashSet::new())).collect();

    for (a, b) in tuples {
        a_map.entry(a.clone()).or_default().insert(b.clone());
        b_map.entry(b).or_default().insert(a);
    }
    debug!(a_side = a_map.len(), b_side = b_map.len(), "grouped pairs");

    for (a, bs) in a_map {
        a_side(a, bs);
    }
    for (b, r#as) in b_map {
        b_side(b, r#as);
    }
}
