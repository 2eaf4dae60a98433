//! Rayon thread pool configuration for batch parsing.

use rayon::{ThreadPoolBuildError, ThreadPoolBuilder};

/// Configures how many worker threads parse reports in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the Rayon global pool.
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Run `f` on a pool of this size. With 0 workers `f` runs on the global
    /// pool; otherwise a temporary pool is built for the call.
    pub fn install<F, R>(&self, f: F) -> Result<R, ThreadPoolBuildError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        Ok(pool.install(f))
    }
}
