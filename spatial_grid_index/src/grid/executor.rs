/// Map-reduce execution for batch insertion and frustum culling.
///
/// The index only needs "map independent work items, then reduce pairwise".
/// Backends decide where the map runs; the sequential executor here is the
/// reference every backend must agree with.

/// Map-reduce executor.
///
/// # Contract
///
/// `reduce` must be applied with a fixed pairing order: a partial result
/// covering earlier items is always passed as the left argument. With an
/// associative `reduce` (list concatenation, map merge) the result is then
/// identical to a sequential left fold, whatever order the partitions finish
/// in. `identity()` must be a neutral element of `reduce`.
pub trait MapReduceExecutor: Send + Sync {
    /// Map every item, then combine the results.
    fn map_reduce<T, R, I, M, F>(&self, items: &[T], identity: I, map: M, reduce: F) -> R
    where
        T: Sync,
        R: Send,
        I: Fn() -> R + Sync + Send,
        M: Fn(&T) -> R + Sync + Send,
        F: Fn(R, R) -> R + Sync + Send;

    /// Short name used in log messages.
    fn name(&self) -> &str;
}

/// Single-threaded executor: map, then left fold from `identity()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl MapReduceExecutor for SequentialExecutor {
    fn map_reduce<T, R, I, M, F>(&self, items: &[T], identity: I, map: M, reduce: F) -> R
    where
        T: Sync,
        R: Send,
        I: Fn() -> R + Sync + Send,
        M: Fn(&T) -> R + Sync + Send,
        F: Fn(R, R) -> R + Sync + Send,
    {
        items.iter().map(map).fold(identity(), |acc, item| reduce(acc, item))
    }

    fn name(&self) -> &str {
        "sequential"
    }
}
