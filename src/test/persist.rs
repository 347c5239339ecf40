use super::model::{draft, node, weighted, Draft, Node};
use crate::persist::restored;
use crate::testing::init_testing;
use crate::{
    Child, EquatableBag, EquatableSequence, KeyedChildren, Map, MultiDictionary, MultiMap,
    OrderedKeyedReadOnlyChildren, ReadOnlyBiGramSet, Shared,
};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use serde::Serialize;

fn round_trip<T: Serialize + DeserializeOwned>(value: &T) -> T {
    let json = serde_json::to_string(value).unwrap();
    serde_json::from_str(&json).unwrap()
}

#[test]
fn map_of_shared_nodes() {
    init_testing();
    let map: Map<String, Shared<Node>> =
        Map::from_elements([weighted("a", 1), weighted("b", 2)]).unwrap();
    let back = restored(round_trip(&map));
    assert_eq!(back.len(), 2);
    assert_eq!(back.get(&"b".to_string()).unwrap().weight, 2);
    // identity is not persisted
    assert!(!Shared::ptr_eq(
        back.get(&"a".to_string()).unwrap(),
        map.get(&"a".to_string()).unwrap()
    ));
}

#[test]
fn multi_dictionary_count_needs_restore() {
    init_testing();
    let tags: MultiDictionary<String, u32> = [
        ("red".to_string(), 1),
        ("red".to_string(), 2),
        ("blue".to_string(), 1),
    ]
    .into_iter()
    .collect();

    let raw: MultiDictionary<String, u32> = round_trip(&tags);
    assert_eq!(raw.len(), 0);
    let back = restored(raw);
    assert_eq!(back.len(), 3);
    assert_eq!(back.get(&"red".to_string()).len(), 2);
    assert!(back.get(&"green".to_string()).is_empty());
}

#[test]
fn equatable_containers_recover_their_hash_codes() {
    init_testing();
    let bag: EquatableBag<String> = ["x", "y"].into_iter().map(String::from).collect();
    let raw = round_trip(&bag);
    assert_eq!(raw.hash_code(), 0);
    let back = restored(raw);
    assert_eq!(back.hash_code(), bag.hash_code());
    assert_eq!(back, bag);

    let sequence: EquatableSequence<u64> = (1..=8).collect();
    let back = restored(round_trip(&sequence));
    assert_eq!(back.hash_code(), sequence.hash_code());
    assert_eq!(back, sequence);
}

#[test]
fn bigram_indices_are_rebuilt_lazily() {
    let pairs: ReadOnlyBiGramSet<u8, char> = [(1, 'a'), (2, 'a')].into_iter().collect();
    assert_eq!(pairs.get_by_second(&'a').len(), 2);
    let back = restored(round_trip(&pairs));
    assert!(!back.has_second_index());
    assert_eq!(back.get_by_second(&'a').len(), 2);
    assert_eq!(back, pairs);
}

#[test]
fn keyed_children_reattach_after_restore() {
    init_testing();
    let children: KeyedChildren<u32, String, Shared<Node>> =
        KeyedChildren::with_children(Some(9), [node("left"), node("right")]).unwrap();

    let raw = round_trip(&children);
    let left = raw.get(&"left".to_string()).unwrap().clone();
    assert_eq!(left.parent(), None);

    let back = restored(raw);
    assert_eq!(left.parent(), Some(9));
    assert_eq!(back.owner(), Some(&9));
    assert_eq!(back.len(), 2);
}

#[test]
fn ordered_children_reindex_after_restore() {
    init_testing();
    let columns: OrderedKeyedReadOnlyChildren<u32, String, Shared<Node>> =
        OrderedKeyedReadOnlyChildren::with_children(
            Some(5),
            [node("id"), node("name"), node("email")],
        )
        .unwrap();

    let raw = round_trip(&columns);
    assert!(raw.try_get_by_key(&"name".to_string()).is_none());

    let back = restored(raw);
    let names: Vec<&str> = back.iter().map(|column| column.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "email"]);
    assert_eq!(back.get_by_key(&"email".to_string()).unwrap().parent(), Some(5));
    assert!(back.get(3).is_err());
}

fn drafts_by_slug() -> MultiMap<String, Draft> {
    MultiMap::from_elements([
        draft(Some("a"), "one"),
        draft(Some("a"), "two"),
        draft(Some("b"), "three"),
    ])
    .unwrap()
}

#[test]
fn multi_map_removal_after_restore() {
    init_testing();
    let mut back = restored(round_trip(&drafts_by_slug()));
    assert_eq!(back.len(), 3);
    assert!(back.remove_key(&"a".to_string()));
    assert!(back.remove(&draft(Some("b"), "three")).unwrap());
    assert_eq!(back.len(), 0);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "restore() was not called")]
fn multi_map_removal_without_restore_is_diagnosed() {
    let mut back = round_trip(&drafts_by_slug());
    back.remove_key(&"a".to_string());
}
