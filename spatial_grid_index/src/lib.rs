/*!
# Spatial Grid Index

Uniform-grid spatial index for interactive 3D scenes and point clouds.

Entities are registered with an axis-aligned bounding box and bucketed into
fixed-size cells. The index answers "which entities occupy this region"
for box queries, camera frustum culling and screen-space drag selection.

## Architecture

- **GridIndex**: the three mutually consistent maps (cell → occupants,
  entity → cells, cell → envelope) plus insert/remove/query operations
- **GridConfig**: cell size, bounded/unbounded keying, envelope policy
- **MapReduceExecutor**: pluggable executor for batch insertion and
  frustum queries. `SequentialExecutor` is built in; parallel backends
  (e.g. `spatial_grid_index_executor_rayon`) implement the same trait
- **SpatialIndex**: trait seam for viewport cullers

Positions are always three-dimensional; 2D callers use z = 0.
*/

// Internal modules
mod error;
pub mod log;
pub mod geometry;
pub mod grid;

// Main grid3d namespace module
pub mod grid3d {
    // Error types
    pub use crate::error::{BoundsViolation, GridError, GridResult};

    // Index, configuration and execution
    pub use crate::grid::*;

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_max_severity, max_severity,
        };
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }
}

// Re-export math library at crate root
pub use glam;
