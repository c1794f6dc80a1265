use serde::{Serialize, Serializer};
use std::fmt;

/// One node of a parsed bullet-list tree.
///
/// A node is exactly one of two kinds: a text leaf, or a branch. A branch is
/// a demoted entry -- its first element is the entry's own text as a `Leaf`,
/// the remaining elements are its child entries in source order. Depth is
/// never stored; it is the node's distance from the forest root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListNode {
    Leaf(String),
    Branch(Vec<ListNode>),
}

impl ListNode {
    /// The entry's own text: the leaf content, or a branch's first leaf.
    pub fn leading_text(&self) -> &str {
        match self {
            ListNode::Leaf(text) => text,
            ListNode::Branch(nodes) => nodes.first().map_or("", ListNode::leading_text),
        }
    }
}

/// An ordered sequence of top-level list entries for one markup block.
pub type ListForest = Vec<ListNode>;

/// A raw reference mention pulled out of a citation template. Ephemeral --
/// it exists only between extraction and canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub raw_name: String,
    /// Trailing pipe argument, when the template carries a display override.
    pub raw_suffix: Option<String>,
}

impl EntityRef {
    pub fn new(raw_name: impl Into<String>) -> Self {
        EntityRef {
            raw_name: raw_name.into(),
            raw_suffix: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Item,
    Trinket,
    Character,
}

impl EntityKind {
    fn prefix(self) -> &'static str {
        match self {
            EntityKind::Item => "item",
            EntityKind::Trinket => "trinket",
            EntityKind::Character => "character",
        }
    }
}

/// Stable external identifier, namespaced by entity kind so item and
/// character ids from the wiki infoboxes cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    pub kind: EntityKind,
    pub num: u32,
}

impl EntityId {
    pub fn new(kind: EntityKind, num: u32) -> Self {
        EntityId { kind, num }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.num)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One resolved cross-reference between two entities.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub source: EntityId,
    pub destination: EntityId,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemRecord {
    pub name: String,
    pub id: EntityId,
    pub quote: Option<String>,
    pub description: Option<String>,
    pub quality: Option<String>,
    pub unlock: Option<String>,
    pub dlc: Option<String>,
    pub effects: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrinketRecord {
    pub name: String,
    pub id: EntityId,
    pub pool: Option<String>,
    pub quote: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub unlock: Option<String>,
    pub dlc: Option<String>,
    pub effects: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterRecord {
    pub name: String,
    pub id: EntityId,
}
