/// Cell keying: position to discrete cell coordinate.
///
/// A cell key holds `floor(coord / cell_size)` for each axis and renders as
/// the string `"ix:iy:iz"`. Distinct integer triples always render to
/// distinct strings, so keys never collide.

use std::fmt;
use std::str::FromStr;
use glam::Vec3;
use crate::error::{BoundsViolation, GridError, GridResult};

/// Identifier of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellKey {
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// World-space position of the cell's min corner.
    pub fn origin(&self, cell_size: f32) -> Vec3 {
        let size = cell_size as f64;
        Vec3::new(
            (self.x as f64 * size) as f32,
            (self.y as f64 * size) as f32,
            (self.z as f64 * size) as f32,
        )
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

/// Error returned when a string is not of the form `"ix:iy:iz"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCellKeyError(String);

impl fmt::Display for ParseCellKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell key '{}', expected \"ix:iy:iz\"", self.0)
    }
}

impl std::error::Error for ParseCellKeyError {}

impl FromStr for CellKey {
    type Err = ParseCellKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':').map(str::parse::<i64>);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Ok(CellKey::new(x, y, z)),
            _ => Err(ParseCellKeyError(s.to_string())),
        }
    }
}

/// Largest cell index magnitude a key can hold.
///
/// Every integer up to 2^53 is exact in f64, so floors inside this range map
/// one-to-one onto keys and neighbouring indices never overflow.
pub const MAX_CELL_INDEX: i64 = 1 << 53;

/// Index of the cell containing `coord` along one axis, or None if the
/// floored quotient is outside `[-MAX_CELL_INDEX, MAX_CELL_INDEX]`.
///
/// Divides in f64 so values just below a cell boundary are not rounded
/// onto it.
pub(crate) fn cell_index(coord: f32, cell_size: f32) -> Option<i64> {
    let floored = (coord as f64 / cell_size as f64).floor();
    (floored.abs() <= MAX_CELL_INDEX as f64).then(|| floored as i64)
}

/// Hash a position to its cell key.
///
/// # Errors
///
/// Returns `GridError::OutOfBounds` with `BoundsViolation::Unrepresentable`
/// if `coord / cell_size` exceeds `MAX_CELL_INDEX` in magnitude on some axis
/// (or is not finite).
pub fn unbounded_hash_key(pos: Vec3, cell_size: f32) -> GridResult<CellKey> {
    match (
        cell_index(pos.x, cell_size),
        cell_index(pos.y, cell_size),
        cell_index(pos.z, cell_size),
    ) {
        (Some(x), Some(y), Some(z)) => Ok(CellKey::new(x, y, z)),
        _ => Err(GridError::OutOfBounds {
            violation: BoundsViolation::Unrepresentable,
            position: pos,
        }),
    }
}

/// Hash a position that must lie inside `[min, max]` on every axis.
///
/// # Errors
///
/// Returns `GridError::OutOfBounds` if any coordinate is negative, greater
/// than `max`, or less than `min` (checked in that order), or if the key is
/// not representable (see `unbounded_hash_key`).
pub fn bounded_hash_key(pos: Vec3, min: f32, max: f32, cell_size: f32) -> GridResult<CellKey> {
    check_bounds(pos, min, max)?;
    unbounded_hash_key(pos, cell_size)
}

/// Bounds check shared by bounded hashing and AABB expansion.
pub(crate) fn check_bounds(pos: Vec3, min: f32, max: f32) -> GridResult<()> {
    let coords = pos.to_array();
    let violation = if coords.iter().any(|&c| c < 0.0) {
        BoundsViolation::Negative
    } else if coords.iter().any(|&c| c > max) {
        BoundsViolation::AboveMax
    } else if coords.iter().any(|&c| c < min) {
        BoundsViolation::BelowMin
    } else {
        return Ok(());
    };
    Err(GridError::OutOfBounds { violation, position: pos })
}

#[cfg(test)]
#[path = "cell_key_tests.rs"]
mod tests;
