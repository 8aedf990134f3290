//! Uniform-grid spatial index
//!
//! Cell keying, envelope math, index storage and the map-reduce query
//! engine.

mod cell_key;
mod config;
mod entity;
mod envelope;
mod executor;
mod index;
mod partial;
mod spatial_index;

pub use cell_key::{CellKey, MAX_CELL_INDEX, ParseCellKeyError, bounded_hash_key, unbounded_hash_key};
pub use config::{EnvelopePolicy, GridConfig, IndexingStrategy};
pub use entity::{Entity, EntityId};
pub use envelope::{cell_envelope, cell_keys_for_aabb, cells_for_aabb, position_envelope};
pub use executor::{MapReduceExecutor, SequentialExecutor};
pub use index::{GridIndex, InsertAllReport};
pub use spatial_index::SpatialIndex;
