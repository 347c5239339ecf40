use crate::{Child, Keyed, ParentCell, Shared};
use serde::{Deserialize, Serialize};

/// A named tree node whose parent is a numeric owner id.
#[derive(Debug, Keyed, Child, Serialize, Deserialize)]
pub struct Node {
    #[key]
    pub name: String,
    pub weight: u32,
    #[parent]
    #[serde(skip)]
    pub parent: ParentCell<u32>,
}

pub fn node(name: &str) -> Shared<Node> {
    weighted(name, 0)
}

pub fn weighted(name: &str, weight: u32) -> Shared<Node> {
    Shared::new(Node {
        name: name.to_string(),
        weight,
        parent: ParentCell::new(),
    })
}

/// An element whose key may not be assigned yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Keyed, Serialize, Deserialize)]
pub struct Draft {
    #[key]
    pub slug: Option<String>,
    pub body: String,
}

pub fn draft(slug: Option<&str>, body: &str) -> Draft {
    Draft {
        slug: slug.map(str::to_string),
        body: body.to_string(),
    }
}

/// A tuple struct keyed and parented by position.
#[derive(Debug, Keyed, Child)]
pub struct Slot(#[key] pub u8, #[parent] pub ParentCell<&'static str>);

/// A child whose title may not be assigned yet.
#[derive(Debug, Keyed, Child)]
pub struct Section {
    #[key]
    pub title: Option<String>,
    #[parent]
    pub parent: ParentCell<u32>,
}

pub fn section(title: Option<&str>) -> Shared<Section> {
    Shared::new(Section {
        title: title.map(str::to_string),
        parent: ParentCell::new(),
    })
}
