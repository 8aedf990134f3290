/// GridIndex: uniform-grid spatial index over entity AABBs.
///
/// Space is bucketed into cubic cells of `cell_size`. Each entity is
/// recorded in every cell its AABB touches. Three maps are kept mutually
/// consistent:
///
/// - `cells`: cell key → occupant ids, in insertion order. An entity
///   inserted twice into the same cell appears twice.
/// - `objects`: entity id → cell keys (the inverse map, used for removal).
/// - `envelopes`: cell key → cell bounds, written on first insertion into
///   the cell and never overwritten. Removal keeps them unless the
///   configured `EnvelopePolicy` is `Prune`.
///
/// Queries scan the envelope cache, so their cost grows with the number
/// of populated cells rather than with the size of the query volume.
///
/// Ownership: the caller owns the index. Mutation needs `&mut self`;
/// concurrent readers must be coordinated by the caller.

use std::collections::BTreeSet;
use std::time::Instant;
use rustc_hash::FxHashMap;
use crate::error::{GridError, GridResult};
use crate::geometry::{Aabb, CullVolume, Frustum, Rect};
use super::cell_key::CellKey;
use super::config::{EnvelopePolicy, GridConfig};
use super::entity::{Entity, EntityId};
use super::envelope::{cell_envelope, cell_keys_for_aabb};
use super::executor::{MapReduceExecutor, SequentialExecutor};
use super::partial::{PartialIndex, merge_results, validate_aabb};

const LOG_SOURCE: &str = "grid3d::GridIndex";

/// Summary of a committed batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertAllReport {
    /// Distinct entities now in the index
    pub entities: usize,
    /// Populated cells now in the index
    pub cells: usize,
}

/// Uniform-grid spatial index
#[derive(Debug, Clone, PartialEq)]
pub struct GridIndex {
    config: GridConfig,
    cells: FxHashMap<CellKey, Vec<EntityId>>,
    objects: FxHashMap<EntityId, Vec<CellKey>>,
    envelopes: FxHashMap<CellKey, Aabb>,
}

impl GridIndex {
    /// Create an empty index.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidConfig` if the configuration fails
    /// `GridConfig::validate`.
    pub fn new(config: GridConfig) -> GridResult<Self> {
        config.validate().map_err(Self::log_and_return_error)?;
        crate::grid_debug!(
            LOG_SOURCE,
            "Created grid index (cell size {}, {:?}, {:?})",
            config.cell_size,
            config.indexing_strategy,
            config.envelope_policy
        );
        Ok(Self {
            config,
            cells: FxHashMap::default(),
            objects: FxHashMap::default(),
            envelopes: FxHashMap::default(),
        })
    }

    /// Log errors before returning them (internal use)
    fn log_and_return_error(error: GridError) -> GridError {
        crate::grid_error!(LOG_SOURCE, "{}", error);
        error
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    // ===== MUTATION =====

    /// Insert an entity into every cell its AABB touches.
    ///
    /// # Errors
    ///
    /// - `GridError::InvalidEntity` if the AABB has a non-finite coordinate,
    ///   min > max on some axis, or a corner whose cell index exceeds
    ///   `MAX_CELL_INDEX`.
    /// - `GridError::OutOfBounds` under the bounded strategy if a touched
    ///   cell lies outside the configured range.
    ///
    /// On error the index is left unchanged.
    pub fn insert(&mut self, id: impl Into<EntityId>, aabb: &Aabb) -> GridResult<()> {
        let id = id.into();
        let keys = self.keys_for(&id, aabb)?;
        self.insert_keys(id, keys);
        Ok(())
    }

    /// Validate and expand an AABB before any map is touched.
    fn keys_for(&self, id: &EntityId, aabb: &Aabb) -> GridResult<Vec<CellKey>> {
        validate_aabb(id, aabb, self.config.cell_size).map_err(Self::log_and_return_error)?;
        cell_keys_for_aabb(aabb, &self.config).map_err(Self::log_and_return_error)
    }

    fn insert_keys(&mut self, id: EntityId, keys: Vec<CellKey>) {
        let cell_size = self.config.cell_size;
        for key in &keys {
            self.envelopes
                .entry(*key)
                .or_insert_with(|| cell_envelope(key, cell_size));
            self.cells.entry(*key).or_default().push(id.clone());
        }
        crate::grid_trace!(LOG_SOURCE, "Inserted '{}' into {} cells", id, keys.len());
        self.objects.entry(id).or_default().extend(keys);
    }

    /// Remove an entity from every cell it occupies.
    ///
    /// Removes one occurrence of the id per recorded cell. Unknown ids are
    /// ignored. Returns true if the entity was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(keys) = self.objects.remove(id) else {
            return false;
        };

        let prune = self.config.envelope_policy == EnvelopePolicy::Prune;
        for key in &keys {
            let emptied = match self.cells.get_mut(key) {
                Some(occupants) => {
                    if let Some(pos) = occupants.iter().position(|e| e.as_str() == id) {
                        occupants.remove(pos);
                    }
                    occupants.is_empty()
                }
                None => false,
            };
            if prune && emptied {
                self.cells.remove(key);
                self.envelopes.remove(key);
            }
        }

        crate::grid_trace!(LOG_SOURCE, "Removed '{}' from {} cells", id, keys.len());
        true
    }

    /// Move an entity to a new AABB (remove then re-insert).
    ///
    /// The new AABB is validated first; on error the entity keeps its
    /// previous cells.
    pub fn update(&mut self, id: impl Into<EntityId>, aabb: &Aabb) -> GridResult<()> {
        let id = id.into();
        let keys = self.keys_for(&id, aabb)?;
        self.remove(id.as_str());
        self.insert_keys(id, keys);
        Ok(())
    }

    /// Remove everything: occupants, inverse map and envelope cache.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.objects.clear();
        self.envelopes.clear();
        crate::grid_debug!(LOG_SOURCE, "Cleared grid index");
    }

    /// Same as `clear`.
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Drop the envelope and occupant list of every cell with no occupant.
    ///
    /// Returns the number of cells pruned. Useful with
    /// `EnvelopePolicy::Retain` after many removals.
    pub fn prune_empty_cells(&mut self) -> usize {
        let empty: Vec<CellKey> = self
            .cells
            .iter()
            .filter(|(_, occupants)| occupants.is_empty())
            .map(|(key, _)| *key)
            .collect();
        for key in &empty {
            self.cells.remove(key);
            self.envelopes.remove(key);
        }
        crate::grid_debug!(LOG_SOURCE, "Pruned {} empty cells", empty.len());
        empty.len()
    }

    // ===== BATCH INSERT =====

    /// Build the index from a batch of entities on the calling thread.
    ///
    /// See `insert_all_with`.
    pub fn insert_all(&mut self, entities: &[Entity]) -> GridResult<InsertAllReport> {
        self.insert_all_with(entities, &SequentialExecutor)
    }

    /// Build the index from a batch of entities with a map-reduce executor.
    ///
    /// Each entity is mapped independently to a `PartialIndex`; fragments are
    /// merged pairwise and the final fragment replaces the index's maps
    /// wholesale. An empty batch leaves the index untouched.
    ///
    /// # Errors
    ///
    /// Any entity without a well-formed AABB (or out of bounds under the
    /// bounded strategy) fails the whole batch; the error names the first
    /// such entity in input order and nothing is committed.
    pub fn insert_all_with<E: MapReduceExecutor>(
        &mut self,
        entities: &[Entity],
        executor: &E,
    ) -> GridResult<InsertAllReport> {
        if entities.is_empty() {
            return Ok(InsertAllReport::default());
        }

        let start = Instant::now();
        let config = self.config;
        let partial = executor
            .map_reduce(
                entities,
                || Ok(PartialIndex::default()),
                |entity| PartialIndex::from_entity(entity, &config),
                merge_results,
            )
            .map_err(Self::log_and_return_error)?;

        if !self.objects.is_empty() {
            crate::grid_info!(
                LOG_SOURCE,
                "insert_all replaced {} existing entities",
                self.objects.len()
            );
        }
        self.cells = partial.cells;
        self.objects = partial.objects;
        self.envelopes = partial.envelopes;

        let report = InsertAllReport {
            entities: self.objects.len(),
            cells: self.cells.len(),
        };
        crate::grid_debug!(
            LOG_SOURCE,
            "insert_all ({}): {} entities into {} cells in {:?}",
            executor.name(),
            report.entities,
            report.cells,
            start.elapsed()
        );
        Ok(report)
    }

    // ===== QUERIES =====

    /// Keys of every cached cell whose envelope intersects `volume`, sorted.
    pub fn cells_intersecting<V: CullVolume>(&self, volume: &V) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self
            .envelopes
            .iter()
            .filter(|(_, envelope)| volume.intersects_aabb(envelope))
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Keys of every cached cell whose envelope intersects the box, sorted.
    pub fn cells_intersecting_aabb(&self, aabb: &Aabb) -> Vec<CellKey> {
        self.cells_intersecting(aabb)
    }

    /// Entities occupying any cell that intersects the box.
    ///
    /// Cell-level only: an entity is returned if it shares a cell with the
    /// box, even when its own AABB does not overlap it.
    pub fn entities_intersecting_aabb(&self, aabb: &Aabb) -> BTreeSet<EntityId> {
        self.entities_in_cells(&self.cells_intersecting_aabb(aabb))
    }

    /// Keys of every cached cell intersecting the frustum, sorted.
    pub fn cells_intersecting_frustum(&self, frustum: &Frustum) -> Vec<CellKey> {
        self.cells_intersecting_frustum_with(frustum, &SequentialExecutor)
    }

    /// Frustum cell query as a map-reduce over a sorted snapshot of the keys.
    ///
    /// Map: key → `[key]` if its envelope is not entirely behind any plane,
    /// `[]` otherwise. Reduce: concatenation.
    pub fn cells_intersecting_frustum_with<E: MapReduceExecutor>(
        &self,
        frustum: &Frustum,
        executor: &E,
    ) -> Vec<CellKey> {
        let start = Instant::now();
        let mut keys: Vec<CellKey> = self.envelopes.keys().copied().collect();
        keys.sort_unstable();

        let envelopes = &self.envelopes;
        let visible = executor.map_reduce(
            &keys,
            Vec::new,
            |key| match envelopes.get(key) {
                Some(envelope) if frustum.intersects_aabb(envelope) => vec![*key],
                _ => Vec::new(),
            },
            concat,
        );

        crate::grid_debug!(
            LOG_SOURCE,
            "cells_intersecting_frustum ({}): {} of {} cells in {:?}",
            executor.name(),
            visible.len(),
            keys.len(),
            start.elapsed()
        );
        visible
    }

    /// Entities occupying any cell that intersects the frustum.
    pub fn entities_intersecting_frustum(&self, frustum: &Frustum) -> BTreeSet<EntityId> {
        self.entities_intersecting_frustum_with(frustum, &SequentialExecutor)
    }

    /// Frustum entity query: the cell pass, then a second map-reduce that
    /// resolves surviving keys to their occupants. Duplicates are removed.
    pub fn entities_intersecting_frustum_with<E: MapReduceExecutor>(
        &self,
        frustum: &Frustum,
        executor: &E,
    ) -> BTreeSet<EntityId> {
        let keys = self.cells_intersecting_frustum_with(frustum, executor);
        if keys.is_empty() {
            return BTreeSet::new();
        }

        let start = Instant::now();
        let cells = &self.cells;
        let occupants = executor.map_reduce(
            &keys,
            Vec::new,
            |key| cells.get(key).cloned().unwrap_or_default(),
            concat,
        );
        let entities: BTreeSet<EntityId> = occupants.into_iter().collect();

        crate::grid_debug!(
            LOG_SOURCE,
            "entities_intersecting_frustum ({}): {} entities in {:?}",
            executor.name(),
            entities.len(),
            start.elapsed()
        );
        entities
    }

    /// Entities in the cells under a screen-space selection rectangle.
    ///
    /// The rectangle becomes a thin AABB (z in [0, 1]) and is run through
    /// the AABB cell query; cells without a current occupant are dropped.
    /// This is a coarse filter: entities are not individually tested
    /// against the rectangle, so an entity sharing a cell with the
    /// rectangle is returned even if it lies outside it.
    pub fn entities_intersecting_screen_rectangle(&self, rect: &Rect) -> BTreeSet<EntityId> {
        self.entities_intersecting_aabb(&rect.to_selection_aabb())
    }

    fn entities_in_cells(&self, keys: &[CellKey]) -> BTreeSet<EntityId> {
        keys.iter()
            .filter_map(|key| self.cells.get(key))
            .flatten()
            .cloned()
            .collect()
    }

    // ===== ACCESSORS =====

    /// Number of cells with an occupant list (possibly empty under `Retain`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of distinct entities.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of cached cell envelopes.
    pub fn envelope_count(&self) -> usize {
        self.envelopes.len()
    }

    /// True if no entity is indexed.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Cells recorded for an entity, in insertion order.
    pub fn cells_of(&self, id: &str) -> Option<&[CellKey]> {
        self.objects.get(id).map(Vec::as_slice)
    }

    /// Occupants of a cell, in insertion order.
    pub fn entities_in(&self, key: &CellKey) -> Option<&[EntityId]> {
        self.cells.get(key).map(Vec::as_slice)
    }

    /// Cached bounds of a cell.
    pub fn envelope(&self, key: &CellKey) -> Option<&Aabb> {
        self.envelopes.get(key)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[EntityId])> {
        self.cells.iter().map(|(key, ids)| (key, ids.as_slice()))
    }

    pub fn objects(&self) -> impl Iterator<Item = (&EntityId, &[CellKey])> {
        self.objects.iter().map(|(id, keys)| (id, keys.as_slice()))
    }

    pub fn envelopes(&self) -> impl Iterator<Item = (&CellKey, &Aabb)> {
        self.envelopes.iter()
    }

    /// Check the map invariants.
    ///
    /// Every `(cell, id)` occurrence in `cells` is matched by one in
    /// `objects` and vice versa, and every key of `cells` has an envelope.
    pub fn is_consistent(&self) -> bool {
        let mut forward: FxHashMap<(&CellKey, &EntityId), usize> = FxHashMap::default();
        for (key, ids) in &self.cells {
            if !self.envelopes.contains_key(key) {
                return false;
            }
            for id in ids {
                *forward.entry((key, id)).or_default() += 1;
            }
        }

        let mut inverse: FxHashMap<(&CellKey, &EntityId), usize> = FxHashMap::default();
        for (id, keys) in &self.objects {
            for key in keys {
                *inverse.entry((key, id)).or_default() += 1;
            }
        }

        forward == inverse
    }
}

fn concat<T>(mut left: Vec<T>, right: Vec<T>) -> Vec<T> {
    left.extend(right);
    left
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
