/// Spatial acceleration structures for scene queries.
///
/// A SpatialIndex indexes entities by their world-space AABB for
/// frustum culling. The viewport culler of an editor holds one behind
/// this trait so the grid can be swapped for another structure.
///
/// Ownership: the caller creates and owns the SpatialIndex.

use crate::error::GridResult;
use crate::geometry::{Aabb, Frustum};
use super::entity::EntityId;
use super::index::GridIndex;

/// Trait for spatial indexing of scene entities.
pub trait SpatialIndex: Send + Sync {
    /// Insert an entity with its world-space AABB.
    fn insert(&mut self, id: EntityId, world_aabb: &Aabb) -> GridResult<()>;

    /// Remove an entity from the index. Unknown ids are ignored.
    fn remove(&mut self, id: &EntityId);

    /// Replace an entity's world-space AABB (e.g. after a transform change).
    fn update(&mut self, id: EntityId, world_aabb: &Aabb) -> GridResult<()>;

    /// Query all entities that may intersect the frustum.
    /// Results are appended to `results`, each entity once.
    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<EntityId>);

    /// Remove all entities from the index.
    fn clear(&mut self);
}

impl SpatialIndex for GridIndex {
    fn insert(&mut self, id: EntityId, world_aabb: &Aabb) -> GridResult<()> {
        GridIndex::insert(self, id, world_aabb)
    }

    fn remove(&mut self, id: &EntityId) {
        GridIndex::remove(self, id.as_str());
    }

    fn update(&mut self, id: EntityId, world_aabb: &Aabb) -> GridResult<()> {
        GridIndex::update(self, id, world_aabb)
    }

    fn query_frustum(&self, frustum: &Frustum, results: &mut Vec<EntityId>) {
        results.extend(self.entities_intersecting_frustum(frustum));
    }

    fn clear(&mut self) {
        GridIndex::clear(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Frustum, Plane};
    use crate::grid::GridConfig;
    use glam::Vec3;

    fn unit_box_frustum(hi: f32) -> Frustum {
        Frustum::new([
            Plane::new(Vec3::X, 0.0),
            Plane::new(-Vec3::X, hi),
            Plane::new(Vec3::Y, 0.0),
            Plane::new(-Vec3::Y, hi),
            Plane::new(Vec3::Z, 0.0),
            Plane::new(-Vec3::Z, hi),
        ])
    }

    #[test]
    fn test_trait_object_round_trip() {
        let mut index: Box<dyn SpatialIndex> = Box::new(GridIndex::new(GridConfig::default()).unwrap());
        let id = EntityId::from("cube");
        index.insert(id.clone(), &Aabb::new(Vec3::splat(1.0), Vec3::splat(2.0))).unwrap();

        let mut results = Vec::new();
        index.query_frustum(&unit_box_frustum(5.0), &mut results);
        assert_eq!(results, vec![id.clone()]);

        index.update(id.clone(), &Aabb::new(Vec3::splat(51.0), Vec3::splat(52.0))).unwrap();
        results.clear();
        index.query_frustum(&unit_box_frustum(5.0), &mut results);
        assert!(results.is_empty());

        index.remove(&id);
        index.clear();
    }
}
