#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;

/// Fixed-size worker pool the scene runs its steps on.
///
/// A worker count of zero, or a build without the `parallel` feature, runs
/// everything on the calling thread.
pub struct CpuDispatcher {
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
    worker_count: usize,
}

impl CpuDispatcher {
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Ok(Self::inline());
        }

        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(worker_count)
                .thread_name(|index| format!("physics-worker-{index}"))
                .build()
                .map_err(|err| {
                    crate::error::BridgeError::BackendInit(format!("worker pool: {err}"))
                })?;
            log::debug!("Created physics dispatcher with {worker_count} workers");
            Ok(Self {
                pool: Some(pool),
                worker_count,
            })
        }

        #[cfg(not(feature = "parallel"))]
        {
            log::debug!("parallel feature disabled, ignoring worker_count = {worker_count}");
            Ok(Self::inline())
        }
    }

    pub fn inline() -> Self {
        Self {
            #[cfg(feature = "parallel")]
            pool: None,
            worker_count: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn is_parallel(&self) -> bool {
        #[cfg(feature = "parallel")]
        {
            self.pool.is_some()
        }
        #[cfg(not(feature = "parallel"))]
        {
            false
        }
    }

    /// Runs `op` on the pool and blocks until it returns.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        #[cfg(feature = "parallel")]
        if let Some(pool) = &self.pool {
            return pool.install(op);
        }
        op()
    }

    /// Order-preserving `filter_map` fanned out over the pool.
    pub fn filter_map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Option<R> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        if self.pool.is_some() {
            return items.par_iter().filter_map(f).collect();
        }
        items.iter().filter_map(f).collect()
    }
}
