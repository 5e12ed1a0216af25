//! SPMD execution: team sizing, the per-worker view, collective reductions
//! and the driver that launches a team.

use num_traits::Float;

pub mod partition;
pub mod reduce;
pub mod team;
pub mod view;

pub use partition::{Plan, partition, plan, plan_with};
pub use reduce::ReduceOp;
pub use team::{Team, TeamReport, WorkerOutcome, run_parallel};
pub use view::WorkerView;

/// Collective operations among the members of a team.
///
/// Every member must make the same sequence of collective calls; a member
/// that skips one leaves its peers waiting forever.
pub trait Comm<T: Float> {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn barrier(&self);
    fn all_reduce(&mut self, x: T, op: ReduceOp) -> T;

    fn all_sum(&mut self, x: T) -> T {
        self.all_reduce(x, ReduceOp::Sum)
    }
    fn all_max(&mut self, x: T) -> T {
        self.all_reduce(x, ReduceOp::Max)
    }
    fn all_min(&mut self, x: T) -> T {
        self.all_reduce(x, ReduceOp::Min)
    }
}

/// Number of workers used when the caller asks for auto-sizing.
pub fn available_workers() -> usize {
    #[cfg(feature = "rayon")]
    {
        num_cpus::get().max(1)
    }
    #[cfg(not(feature = "rayon"))]
    {
        std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
    }
}
