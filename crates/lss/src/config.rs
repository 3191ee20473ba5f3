//! Configuration and validation of a search run.

use crate::Error;

/// Validates the fraction of candidate labels skipped at every node.
pub fn validate_skip(skip: f64) -> Result<(), Error> {
    if !(0.0..1.0).contains(&skip) {
        return Err(Error::invalid_skip(skip));
    }
    Ok(())
}

/// Validates the number of worker threads.
pub fn validate_workers(workers: usize) -> Result<(), Error> {
    if workers == 0 {
        return Err(Error::UnspecifiedInput(
            "The number of workers must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates the capacity of the task queue.
pub fn validate_queue_size(queue_size: usize) -> Result<(), Error> {
    if queue_size == 0 {
        return Err(Error::UnspecifiedInput(
            "The queue size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Settings of the coordinator of a parallel search.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Number of worker threads.
    pub workers: usize,

    /// Capacity of the task queue.
    pub queue_size: usize,

    /// Fraction of candidate labels skipped at every node.
    pub skip: f64,

    /// Seed of the run.
    pub seed: u64,

    /// Whether to draw a progress bar.
    pub progress: bool,
}

impl CoordinatorConfig {
    /// Creates a validated configuration, without progress bar.
    pub fn new(workers: usize, queue_size: usize, skip: f64, seed: u64) -> Result<Self, Error> {
        validate_workers(workers)?;
        validate_queue_size(queue_size)?;
        validate_skip(skip)?;
        Ok(Self {
            workers,
            queue_size,
            skip,
            seed,
            progress: false,
        })
    }

    /// Enables or disables the progress bar.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}
