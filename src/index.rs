use crate::alias::CanonicalKey;
use crate::models::EntityId;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::warn;

/// Mapping from canonical entity name to assigned id.
///
/// Populated incrementally while entities are ingested and read-only during
/// relationship extraction. Keys come from [`crate::alias::canonical_key`],
/// so every spelling the alias table repairs lands on the same entry.
#[derive(Debug, Default)]
pub struct NameIndex {
    entries: FxHashMap<CanonicalKey, EntityId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write-once per key; a second id for the same key is ignored.
    pub fn insert(&mut self, key: CanonicalKey, id: EntityId) {
        match self.entries.entry(key) {
            Entry::Occupied(existing) => {
                warn!(
                    key = %existing.key(),
                    kept = %existing.get(),
                    ignored = %id,
                    "duplicate name index entry"
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
    }

    pub fn resolve(&self, key: &str) -> Option<EntityId> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;

    #[test]
    fn resolve_known_key() {
        let mut index = NameIndex::new();
        index.insert("sad onion".to_string(), EntityId::new(EntityKind::Item, 1));
        assert_eq!(
            index.resolve("sad onion"),
            Some(EntityId::new(EntityKind::Item, 1))
        );
    }

    #[test]
    fn resolve_unknown_key() {
        let index = NameIndex::new();
        assert_eq!(index.resolve("nothing"), None);
    }

    #[test]
    fn first_insert_wins() {
        let mut index = NameIndex::new();
        index.insert("onion".to_string(), EntityId::new(EntityKind::Item, 1));
        index.insert("onion".to_string(), EntityId::new(EntityKind::Trinket, 2));
        assert_eq!(
            index.resolve("onion"),
            Some(EntityId::new(EntityKind::Item, 1))
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn len_tracks_distinct_keys() {
        let mut index = NameIndex::new();
        assert!(index.is_empty());
        index.insert("a".to_string(), EntityId::new(EntityKind::Item, 1));
        index.insert("b".to_string(), EntityId::new(EntityKind::Character, 2));
        assert_eq!(index.len(), 2);
    }
}
