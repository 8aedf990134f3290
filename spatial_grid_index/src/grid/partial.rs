/// Per-entity index fragment produced by the map phase of a batch insert.
///
/// Fragments form a monoid: the default value is the identity and `merge`
/// concatenates occupant and cell lists (left first) and overwrites
/// envelopes right-wins. Envelopes for the same key are always equal, so
/// the overwrite never changes a value.

use rustc_hash::FxHashMap;
use crate::error::{GridError, GridResult};
use crate::geometry::Aabb;
use super::cell_key::{CellKey, unbounded_hash_key};
use super::config::GridConfig;
use super::entity::{Entity, EntityId};
use super::envelope::{cell_envelope, cell_keys_for_aabb};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PartialIndex {
    pub(crate) cells: FxHashMap<CellKey, Vec<EntityId>>,
    pub(crate) objects: FxHashMap<EntityId, Vec<CellKey>>,
    pub(crate) envelopes: FxHashMap<CellKey, Aabb>,
}

impl PartialIndex {
    /// Build the fragment for one entity without touching shared state.
    pub(crate) fn from_entity(entity: &Entity, config: &GridConfig) -> GridResult<Self> {
        let aabb = entity.aabb.as_ref().ok_or_else(|| {
            GridError::InvalidEntity(format!("entity '{}' is missing its AABB", entity.id))
        })?;
        validate_aabb(&entity.id, aabb, config.cell_size)?;

        let keys = cell_keys_for_aabb(aabb, config)?;
        let mut partial = PartialIndex::default();
        for key in &keys {
            partial
                .envelopes
                .entry(*key)
                .or_insert_with(|| cell_envelope(key, config.cell_size));
            partial.cells.entry(*key).or_default().push(entity.id.clone());
        }
        partial.objects.insert(entity.id.clone(), keys);
        Ok(partial)
    }

    /// Combine two fragments, `self` covering the earlier entities.
    pub(crate) fn merge(mut self, other: PartialIndex) -> PartialIndex {
        for (key, ids) in other.cells {
            self.cells.entry(key).or_default().extend(ids);
        }
        for (id, keys) in other.objects {
            self.objects.entry(id).or_default().extend(keys);
        }
        self.envelopes.extend(other.envelopes);
        self
    }
}

/// Reject boxes with non-finite coordinates, min > max, or a corner whose
/// cell index does not fit in a `CellKey`.
pub(crate) fn validate_aabb(id: &EntityId, aabb: &Aabb, cell_size: f32) -> GridResult<()> {
    if !aabb.is_well_formed() {
        return Err(GridError::InvalidEntity(format!(
            "entity '{}' has a malformed AABB (min {:?}, max {:?})",
            id, aabb.min, aabb.max
        )));
    }
    if unbounded_hash_key(aabb.min, cell_size).is_err()
        || unbounded_hash_key(aabb.max, cell_size).is_err()
    {
        return Err(GridError::InvalidEntity(format!(
            "entity '{}' lies outside the representable cell range (min {:?}, max {:?}, cell size {})",
            id, aabb.min, aabb.max, cell_size
        )));
    }
    Ok(())
}

/// Reduce step over fallible fragments; the leftmost error wins.
pub(crate) fn merge_results(
    left: GridResult<PartialIndex>,
    right: GridResult<PartialIndex>,
) -> GridResult<PartialIndex> {
    match (left, right) {
        (Ok(left), Ok(right)) => Ok(left.merge(right)),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}
