use super::model::{draft, node, section, Section, Slot};
use crate::container::contract::Owned;
use crate::testing::init_testing;
use crate::{
    Child, Children, ElementCollection, Error, Keyed, KeyedChildren, Map, MultiMap,
    OrderedKeyedReadOnlyChildren, ParentCell, ReadBag, Shared,
};
use pretty_assertions::assert_eq;

type Nodes = KeyedChildren<u32, String, Shared<super::model::Node>>;
type Sections = KeyedChildren<u32, String, Shared<Section>>;

#[test]
fn derived_key_and_parent() {
    let x = node("x");
    assert_eq!(x.key(), Some("x".to_string()));
    assert_eq!(x.parent(), None);
    x.set_parent(Some(4));
    assert_eq!(x.parent(), Some(4));

    let slot = Slot(3, ParentCell::new());
    assert_eq!(slot.key(), Some(3));
    slot.set_parent(Some("row"));
    assert_eq!(slot.parent(), Some("row"));

    assert_eq!(draft(None, "text").key(), None);
    assert_eq!(draft(Some("intro"), "text").key(), Some("intro".to_string()));
}

#[test]
fn keyed_children_remove_then_remove_key() {
    init_testing();
    let mut nodes = Nodes::new(Some(1));
    let c1 = node("x");
    assert!(nodes.add(c1.clone()).unwrap());
    assert_eq!(c1.parent(), Some(1));

    assert!(nodes.remove(&c1).unwrap());
    assert_eq!(c1.parent(), None);
    assert!(!nodes.remove_key(&"x".to_string()));
    assert!(nodes.is_empty());
}

#[test]
fn keyed_children_collision_leaves_newcomer_detached() {
    let mut nodes = Nodes::new(Some(1));
    let first = node("x");
    let second = node("x");
    assert!(nodes.add(first.clone()).unwrap());
    assert!(!nodes.add(second.clone()).unwrap());
    assert_eq!(second.parent(), None);

    // same key, different identity
    assert!(!nodes.remove(&second).unwrap());
    assert_eq!(first.parent(), Some(1));
    assert_eq!(nodes.len(), 1);
}

#[test]
fn every_child_tracks_owner_through_mutations() {
    init_testing();
    let a = node("a");
    let b = node("b");
    let c = node("c");
    let mut children = Children::new(Some(7u32));
    children.add_all([a.clone(), b.clone()]);
    assert!(!children.add(a.clone()));
    children.add(c.clone());
    assert!(children.remove(&b));
    children.set_owner(Some(8));

    for child in children.iter() {
        assert_eq!(child.parent(), Some(8));
    }
    assert_eq!(b.parent(), None);
    assert_eq!(children.len(), 2);

    children.clear();
    assert_eq!(a.parent(), None);
    assert_eq!(c.parent(), None);
    assert!(children.is_empty());
}

#[test]
fn owner_cleared_unsets_parents() {
    let kept = node("kept");
    let mut nodes = Nodes::with_children(Some(2), [kept.clone()]).unwrap();
    nodes.set_owner(None);
    assert_eq!(kept.parent(), None);
    assert_eq!(nodes.owner(), None);
    assert!(nodes.contains_key(&"kept".to_string()));
}

#[test]
fn collection_surface_of_read_only_children() {
    let child = node("only");
    let mut read_only =
        crate::KeyedReadOnlyChildren::<u32, String, _>::with_children(Some(3), [child.clone()])
            .unwrap();
    assert!(read_only.is_read_only());
    assert!(matches!(
        read_only.remove_element(&child),
        Err(Error::InvalidOperation { .. })
    ));
    assert!(matches!(read_only.clear_elements(), Err(Error::InvalidOperation { .. })));
    assert_eq!(child.parent(), Some(3));
    assert!(ReadBag::contains(&read_only, &child));
}

#[test]
fn map_rejects_unset_key() {
    let mut drafts: Map<String, _> = Map::new();
    assert!(drafts.add(draft(Some("a"), "first")).unwrap());
    assert!(!drafts.add(draft(Some("a"), "second")).unwrap());
    let err = drafts.add(draft(None, "anonymous")).unwrap_err();
    assert!(matches!(err, Error::NullArgument { .. }));
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts.get(&"a".to_string()).unwrap().body, "first");
}

#[test]
fn failed_construction_attaches_nothing() {
    init_testing();
    let intro = section(Some("intro"));
    let built = Sections::with_children(Some(7), [intro.clone(), section(None)]);
    assert!(matches!(built, Err(Error::NullArgument { .. })));
    assert_eq!(intro.parent(), None);

    let ordered = OrderedKeyedReadOnlyChildren::<u32, String, _>::with_children(
        Some(7),
        [intro.clone(), section(None)],
    );
    assert!(matches!(ordered, Err(Error::NullArgument { .. })));
    assert_eq!(intro.parent(), None);
}

#[test]
fn failed_add_all_leaves_collection_unchanged() {
    let (kept, intro) = (section(Some("kept")), section(Some("intro")));
    let mut sections = Sections::with_children(Some(9), [kept.clone()]).unwrap();

    let err = sections.add_all([intro.clone(), section(None)]).unwrap_err();
    assert!(matches!(err, Error::NullArgument { .. }));
    assert_eq!(sections.len(), 1);
    assert_eq!(intro.parent(), None);
    assert_eq!(kept.parent(), Some(9));

    sections.add_all([intro.clone()]).unwrap();
    assert_eq!(intro.parent(), Some(9));
}

#[test]
fn keyed_bulk_adds_reject_whole_batch() {
    let mut drafts: Map<String, _> = Map::new();
    let err = drafts
        .add_all([draft(Some("a"), "first"), draft(None, "anonymous")])
        .unwrap_err();
    assert!(matches!(err, Error::NullArgument { .. }));
    assert!(drafts.is_empty());
    assert!(Map::<String, _>::from_elements([draft(None, "anonymous")]).is_err());

    let mut grouped: MultiMap<String, _> = MultiMap::new();
    grouped.add(draft(Some("a"), "first")).unwrap();
    assert!(grouped
        .add_all([draft(Some("a"), "second"), draft(None, "anonymous")])
        .is_err());
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped.get(&"a".to_string()).len(), 1);
}
