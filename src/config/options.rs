//! API options for a team invocation.
//!
//! This module provides the `TeamOptions` struct, which selects how many
//! workers a parallel invocation may use, how small a partition may get
//! before the team is shrunk, and how threshold inversion reacts to entries
//! that are too small to invert.

/// Minimum number of vector entries per worker.
///
/// Below this, barrier and thread launch costs dominate the arithmetic.
pub const MIN_PARTITION_SIZE: usize = 50;

/// What threshold inversion does with entries at or below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingularityPolicy {
    /// Write `1.0` and carry on.
    #[default]
    Substitute,
    /// Write `1.0`, then fail the kernel on every worker with
    /// [`PlaError::NumericSingularity`](crate::error::PlaError::NumericSingularity).
    Report,
}

/// Team sizing & numeric policy.
#[derive(Debug, Clone)]
pub struct TeamOptions {
    /// Requested number of workers (0 = one per available core)
    pub workers: usize,

    /// Smallest partition the sizing policy accepts
    pub min_partition_size: usize,

    /// Behaviour of threshold inversion kernels
    pub singularity: SingularityPolicy,
}

impl Default for TeamOptions {
    fn default() -> Self {
        Self {
            workers: 0,
            min_partition_size: MIN_PARTITION_SIZE,
            singularity: SingularityPolicy::default(),
        }
    }
}

impl TeamOptions {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_min_partition_size(mut self, min_partition_size: usize) -> Self {
        self.min_partition_size = min_partition_size;
        self
    }

    pub fn with_singularity_policy(mut self, singularity: SingularityPolicy) -> Self {
        self.singularity = singularity;
        self
    }
}
