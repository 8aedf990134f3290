//! Error types for the spatial grid index
//!
//! This module defines the error types returned by index construction,
//! cell keying, insertion and batch insertion.

use std::fmt;
use glam::Vec3;

/// Result type for grid index operations
pub type GridResult<T> = Result<T, GridError>;

/// Which bound a position violated under the bounded hashing strategy.
///
/// All of them are reported as the same error kind (`GridError::OutOfBounds`);
/// the variant only refines the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsViolation {
    /// At least one coordinate is below zero
    Negative,
    /// At least one coordinate is greater than the configured max
    AboveMax,
    /// At least one coordinate is less than the configured min
    BelowMin,
    /// `coord / cell_size` is too large in magnitude for a cell key
    Unrepresentable,
}

impl fmt::Display for BoundsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsViolation::Negative => write!(f, "negative position value is not allowed"),
            BoundsViolation::AboveMax => write!(f, "position is greater than max"),
            BoundsViolation::BelowMin => write!(f, "position is less than min"),
            BoundsViolation::Unrepresentable => {
                write!(f, "position is outside the representable cell range")
            }
        }
    }
}

/// Grid index errors
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Entity has a missing or malformed AABB
    InvalidEntity(String),

    /// Bounded hashing was given a position outside the configured range
    OutOfBounds {
        /// Which bound was violated
        violation: BoundsViolation,
        /// The offending position
        position: Vec3,
    },

    /// Grid configuration rejected at construction
    InvalidConfig(String),

    /// Map-reduce executor backend could not be created
    ExecutorFailed(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidEntity(msg) => write!(f, "Invalid entity: {}", msg),
            GridError::OutOfBounds { violation, position } => write!(
                f,
                "Position out of bounds: {} ({}, {}, {})",
                violation, position.x, position.y, position.z
            ),
            GridError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            GridError::ExecutorFailed(msg) => write!(f, "Executor failed: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
