/// Envelope math and AABB-to-cells expansion.
///
/// An entity's AABB is expanded to every cell it touches; each touched
/// cell gets an envelope (its own AABB) cached by the index.

use std::ops::Range;
use glam::Vec3;
use crate::error::GridResult;
use crate::geometry::Aabb;
use super::cell_key::{CellKey, check_bounds, unbounded_hash_key};
use super::config::{GridConfig, IndexingStrategy};

/// Bounds of the cell containing `pos`.
///
/// `min = floor(pos / cell_size) * cell_size` per axis, `max = min + cell_size`.
///
/// # Errors
///
/// Fails like `unbounded_hash_key` when the cell index is not representable.
pub fn position_envelope(pos: Vec3, cell_size: f32) -> GridResult<Aabb> {
    Ok(cell_envelope(&unbounded_hash_key(pos, cell_size)?, cell_size))
}

/// Bounds of the cell identified by `key`.
pub fn cell_envelope(key: &CellKey, cell_size: f32) -> Aabb {
    let min = key.origin(cell_size);
    Aabb::new(min, min + Vec3::splat(cell_size))
}

/// Cell indices covered along one axis, from the floored min index `start`
/// up to (excluding) `ceil(hi / size)`.
///
/// A zero-extent span sitting on a cell boundary has floor == ceil, so the
/// range is widened to one cell. `start` and `floor(hi / size)` are both
/// within `MAX_CELL_INDEX`, so neither the ceil nor `start + 1` can overflow.
fn axis_span(start: i64, hi: f32, cell_size: f32) -> Range<i64> {
    let end = (hi as f64 / cell_size as f64).ceil() as i64;
    start..end.max(start + 1)
}

/// Keys of every cell the AABB touches, x-major then y then z.
fn spanned_keys(aabb: &Aabb, cell_size: f32) -> GridResult<impl Iterator<Item = CellKey>> {
    let lo = unbounded_hash_key(aabb.min, cell_size)?;
    unbounded_hash_key(aabb.max, cell_size)?;

    let xs = axis_span(lo.x, aabb.max.x, cell_size);
    let ys = axis_span(lo.y, aabb.max.y, cell_size);
    let zs = axis_span(lo.z, aabb.max.z, cell_size);
    Ok(xs.flat_map(move |x| {
        let zs = zs.clone();
        ys.clone().flat_map(move |y| zs.clone().map(move |z| CellKey::new(x, y, z)))
    }))
}

/// Min corners of every cell the AABB touches.
///
/// An entity spanning N, M and P cells on the three axes yields N×M×P
/// positions; a point yields exactly one.
///
/// # Errors
///
/// Returns `GridError::OutOfBounds` (`BoundsViolation::Unrepresentable`) if
/// a corner of the box is outside the representable cell range.
pub fn cells_for_aabb(aabb: &Aabb, cell_size: f32) -> GridResult<Vec<Vec3>> {
    Ok(spanned_keys(aabb, cell_size)?
        .map(|key| key.origin(cell_size))
        .collect())
}

/// Keys of every cell the AABB touches, hashed with the configured strategy.
///
/// # Errors
///
/// Returns `GridError::OutOfBounds` if a corner of the box is outside the
/// representable cell range. Under `IndexingStrategy::Bounded`, also for
/// the first cell whose min corner falls outside the configured range.
pub fn cell_keys_for_aabb(aabb: &Aabb, config: &GridConfig) -> GridResult<Vec<CellKey>> {
    let keys = spanned_keys(aabb, config.cell_size)?;
    match config.indexing_strategy {
        IndexingStrategy::Unbounded => Ok(keys.collect()),
        IndexingStrategy::Bounded => keys
            .map(|key| {
                check_bounds(key.origin(config.cell_size), config.min, config.max)?;
                Ok(key)
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
