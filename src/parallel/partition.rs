//! Team sizing and partitioning of the global index space.
//!
//! Worker `i` of `p` owns the half-open range
//! `[i * (n / p), (i + 1) * (n / p))`, except the last worker whose range ends
//! at `n` and so absorbs the remainder of the division.

use std::ops::Range;

use crate::config::MIN_PARTITION_SIZE;

/// Team size and the partition owned by each worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub workers: usize,
    pub partitions: Vec<Range<usize>>,
}

/// Plan with the default minimum partition size.
pub fn plan(global_size: usize, requested: usize) -> Plan {
    plan_with(global_size, requested, MIN_PARTITION_SIZE)
}

/// Size a team for `global_size` entries and partition the index space.
///
/// `requested == 0` asks for one worker per available core. The team is then
/// shrunk so that every worker gets at least `min_partition_size` entries,
/// never below one worker.
pub fn plan_with(global_size: usize, requested: usize, min_partition_size: usize) -> Plan {
    let workers = team_size(global_size, requested, min_partition_size);
    let partitions = (0..workers)
        .map(|rank| partition(global_size, workers, rank))
        .collect();
    Plan { workers, partitions }
}

pub(crate) fn team_size(global_size: usize, requested: usize, min_partition_size: usize) -> usize {
    let mut workers = if requested == 0 {
        super::available_workers()
    } else {
        requested
    };
    if workers.saturating_mul(min_partition_size) > global_size {
        let capped = (global_size / min_partition_size).max(1);
        log::debug!(
            "shrinking team from {workers} to {capped} workers for {global_size} entries \
             (minimum {min_partition_size} per worker)"
        );
        workers = capped;
    }
    workers
}

/// Range of indices owned by worker `rank` out of `workers`.
pub fn partition(global_size: usize, workers: usize, rank: usize) -> Range<usize> {
    debug_assert!(rank < workers, "rank {rank} out of {workers} workers");
    let local = global_size / workers;
    let start = rank * local;
    let end = if rank + 1 == workers {
        global_size
    } else {
        (rank + 1) * local
    };
    start..end
}
