/// Entity identifiers and batch-insert records.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use crate::geometry::Aabb;

/// Opaque caller-supplied entity identifier (a name, a UUID...).
///
/// The index never generates ids. Cloning is a reference-count bump, so an
/// id can be stored once per occupied cell without copying the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Arc<str>);

impl EntityId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One record of a batch insert.
///
/// `aabb` is optional because batch input often comes from scene records
/// whose bounds have not been computed yet; such records fail the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub aabb: Option<Aabb>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, aabb: Aabb) -> Self {
        Self { id: id.into(), aabb: Some(aabb) }
    }

    /// Record with no bounding box yet.
    pub fn unbounded(id: impl Into<EntityId>) -> Self {
        Self { id: id.into(), aabb: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_entity_id_conversions() {
        let a = EntityId::from("box1");
        let b = EntityId::from("box1".to_string());
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "box1");
        assert_eq!(a.to_string(), "box1");
    }

    #[test]
    fn test_entity_id_lookup_by_str() {
        let mut map: FxHashMap<EntityId, u32> = FxHashMap::default();
        map.insert(EntityId::from("point"), 1);
        assert_eq!(map.get("point"), Some(&1));
        assert_eq!(map.get("box"), None);
    }

    #[test]
    fn test_entity_id_ordering_is_lexicographic() {
        let mut ids = vec![EntityId::from("b"), EntityId::from("a"), EntityId::from("c")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(EntityId::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
