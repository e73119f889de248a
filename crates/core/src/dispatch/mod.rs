//! Fan-out of cutout requests over a bounded worker pool.
//!
//! With one worker the records are processed sequentially in input order.
//! With more, every record becomes its own task and a semaphore caps the
//! number in flight. Either way the call returns only once every record has
//! been handled.

mod config;
mod pool;

pub use config::DispatchConfig;
pub use pool::CutoutDispatcher;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a dispatch run before or while it starts tasks.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The worker count is zero.
    #[error("Worker count must be at least 1")]
    NoWorkers,

    /// The output directory could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The worker pool was closed while tasks were still being queued.
    #[error("Worker pool closed")]
    PoolClosed,
}

/// Counts for one dispatch run.
///
/// `saved + skipped + failed == requested` once the run has returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Records handed to the dispatcher.
    pub requested: usize,
    /// Cutouts written to disk.
    pub saved: usize,
    /// Cutouts the service could not deliver.
    pub skipped: usize,
    /// Tasks that hit a local error or panicked.
    pub failed: usize,
}

impl DispatchReport {
    /// Whether any task failed abnormally.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
