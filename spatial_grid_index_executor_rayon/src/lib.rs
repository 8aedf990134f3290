/*!
# Spatial Grid Index - Rayon Executor Backend

Parallel map-reduce executor for the spatial_grid_index crate.

Batch insertion and frustum queries take any `MapReduceExecutor`; this crate
provides one that maps work items on a rayon thread pool, either the global
pool or a dedicated one sized at construction.
*/

use std::fmt;
use std::sync::Arc;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use spatial_grid_index::grid3d::{GridError, GridResult, MapReduceExecutor};

const LOG_SOURCE: &str = "grid3d::RayonExecutor";

/// Map-reduce executor backed by rayon.
///
/// `reduce` runs through rayon's indexed reduction, which always passes the
/// partial result of the earlier items as the left argument. Results are
/// therefore identical to `SequentialExecutor` for associative reducers.
#[derive(Clone, Default)]
pub struct RayonExecutor {
    /// None runs on rayon's global pool
    pool: Option<Arc<ThreadPool>>,
}

impl RayonExecutor {
    /// Executor on the global rayon pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Executor on a dedicated pool of `threads` workers.
    ///
    /// `threads == 0` lets rayon pick (one worker per logical CPU).
    ///
    /// # Errors
    ///
    /// Returns `GridError::ExecutorFailed` if the pool cannot be built.
    pub fn with_threads(threads: usize) -> GridResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("grid3d-worker-{}", i))
            .build()
            .map_err(|e| {
                let error = GridError::ExecutorFailed(format!(
                    "failed to build rayon pool with {} threads: {}",
                    threads, e
                ));
                spatial_grid_index::grid_error!(LOG_SOURCE, "{}", error);
                error
            })?;

        spatial_grid_index::grid_debug!(
            LOG_SOURCE,
            "Created rayon pool with {} threads",
            pool.current_num_threads()
        );
        Ok(Self { pool: Some(Arc::new(pool)) })
    }

    /// Worker count of the pool this executor runs on.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl fmt::Debug for RayonExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayonExecutor")
            .field("dedicated_pool", &self.pool.is_some())
            .field("num_threads", &self.num_threads())
            .finish()
    }
}

impl MapReduceExecutor for RayonExecutor {
    fn map_reduce<T, R, I, M, F>(&self, items: &[T], identity: I, map: M, reduce: F) -> R
    where
        T: Sync,
        R: Send,
        I: Fn() -> R + Sync + Send,
        M: Fn(&T) -> R + Sync + Send,
        F: Fn(R, R) -> R + Sync + Send,
    {
        let run = || items.par_iter().map(map).reduce(identity, reduce);
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn name(&self) -> &str {
        "rayon"
    }
}
