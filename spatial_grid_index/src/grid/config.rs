/// Grid index configuration.
///
/// The configuration is fixed for the lifetime of a `GridIndex`; changing
/// the cell size means building a new index.

use glam::Vec3;
use crate::error::{GridError, GridResult};
use super::cell_key::{CellKey, bounded_hash_key, unbounded_hash_key};

/// How positions are turned into cell keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexingStrategy {
    /// Positions must lie in `[min, max]` and be non-negative
    Bounded,
    /// Any position whose cell index fits in a key is accepted
    #[default]
    Unbounded,
}

impl IndexingStrategy {
    /// Hash a position with this strategy.
    pub fn hash_key(&self, pos: Vec3, config: &GridConfig) -> GridResult<CellKey> {
        match self {
            IndexingStrategy::Bounded => {
                bounded_hash_key(pos, config.min, config.max, config.cell_size)
            }
            IndexingStrategy::Unbounded => unbounded_hash_key(pos, config.cell_size),
        }
    }
}

/// What happens to a cell's cached envelope when its last occupant is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopePolicy {
    /// Keep the envelope and the (now empty) occupant list
    #[default]
    Retain,
    /// Drop the envelope and the occupant list as soon as the cell empties
    Prune,
}

/// Grid index configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Edge length of one cell, identical on every axis
    pub cell_size: f32,
    /// Lowest coordinate accepted by the bounded strategy
    pub min: f32,
    /// Highest coordinate accepted by the bounded strategy
    pub max: f32,
    /// Position to cell key strategy
    pub indexing_strategy: IndexingStrategy,
    /// Envelope cache behavior on removal
    pub envelope_policy: EnvelopePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 10.0,
            min: 0.0,
            max: 1000.0,
            indexing_strategy: IndexingStrategy::Unbounded,
            envelope_policy: EnvelopePolicy::Retain,
        }
    }
}

impl GridConfig {
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_bounds(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_indexing_strategy(mut self, strategy: IndexingStrategy) -> Self {
        self.indexing_strategy = strategy;
        self
    }

    pub fn with_envelope_policy(mut self, policy: EnvelopePolicy) -> Self {
        self.envelope_policy = policy;
        self
    }

    /// Check the configuration before an index is built from it.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidConfig` if the cell size is not a positive
    /// finite number, if min/max are not finite, or if min > max.
    pub fn validate(&self) -> GridResult<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "cell size must be a positive finite number, got {}",
                self.cell_size
            )));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GridError::InvalidConfig(format!(
                "bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(GridError::InvalidConfig(format!(
                "min ({}) is greater than max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridConfig::default();
        assert_eq!(config.cell_size, 10.0);
        assert_eq!(config.min, 0.0);
        assert_eq!(config.max, 1000.0);
        assert_eq!(config.indexing_strategy, IndexingStrategy::Unbounded);
        assert_eq!(config.envelope_policy, EnvelopePolicy::Retain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = GridConfig::default()
            .with_cell_size(64.0)
            .with_bounds(-128.0, 128.0)
            .with_indexing_strategy(IndexingStrategy::Bounded)
            .with_envelope_policy(EnvelopePolicy::Prune);
        assert_eq!(config.cell_size, 64.0);
        assert_eq!(config.min, -128.0);
        assert_eq!(config.max, 128.0);
        assert_eq!(config.indexing_strategy, IndexingStrategy::Bounded);
        assert_eq!(config.envelope_policy, EnvelopePolicy::Prune);
    }

    #[test]
    fn test_validate_rejects_bad_cell_size() {
        for cell_size in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = GridConfig::default().with_cell_size(cell_size).validate();
            assert!(matches!(result, Err(GridError::InvalidConfig(_))), "cell size {}", cell_size);
        }
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let result = GridConfig::default().with_bounds(10.0, -10.0).validate();
        assert!(matches!(result, Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_strategy_dispatch() {
        let config = GridConfig::default();
        let pos = Vec3::new(-5.0, 5.0, 5.0);

        let key = IndexingStrategy::Unbounded.hash_key(pos, &config).unwrap();
        assert_eq!(key, CellKey::new(-1, 0, 0));

        assert!(IndexingStrategy::Bounded.hash_key(pos, &config).is_err());
        assert_eq!(
            IndexingStrategy::Bounded.hash_key(Vec3::splat(15.0), &config).unwrap(),
            CellKey::new(1, 1, 1)
        );
    }
}
