//! Batch execution options.

use std::num::NonZeroUsize;

/// Options controlling how a batch is executed.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker threads for document conversion (0 = available parallelism)
    pub workers: usize,

    /// Whether to convert documents in parallel
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Convert documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Number of worker threads to start.
    pub fn effective_workers(&self) -> usize {
        if !self.parallel {
            return 1;
        }
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            parallel: true,
        }
    }
}
