//! Configuration for the cutout dispatcher.

use serde::{Deserialize, Serialize};

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Number of concurrent downloads. `1` runs sequentially in input order.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Log progress after every this many completed requests (0 disables).
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_workers() -> usize {
    5
}

fn default_progress_every() -> usize {
    100
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            progress_every: default_progress_every(),
        }
    }
}

impl DispatchConfig {
    /// Configuration with the given worker count.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}
