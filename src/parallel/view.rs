//! Per-worker handle into the shared execution context.

use std::ops::Range;

use num_traits::Float;

use crate::config::SingularityPolicy;
use crate::context::ExecContext;
use crate::core::SharedVector;
use crate::error::PlaError;

use super::partition;

/// What one worker of a team sees: its rank, the partition it owns and its
/// half of the double-buffered reduction scratch.
///
/// Vector and sparse kernels are methods of the view and only ever write
/// inside `[start, end)`.
pub struct WorkerView<'s, T> {
    pub(crate) ctx: &'s ExecContext<T>,
    pub(crate) rank: usize,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Reduction buffer the next collective writes into (0 or 1)
    pub(crate) active: usize,
    /// Scratch vectors requested so far
    pub(crate) allocated: usize,
}

impl<'s, T: Float + Send + Sync> WorkerView<'s, T> {
    pub(crate) fn new(ctx: &'s ExecContext<T>, rank: usize) -> Self {
        let Range { start, end } = partition::partition(ctx.size(), ctx.workers(), rank);
        Self {
            ctx,
            rank,
            start,
            end,
            active: 0,
            allocated: 0,
        }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn workers(&self) -> usize {
        self.ctx.workers()
    }

    /// True on worker 0, the conventional single writer for team-wide output.
    pub fn first(&self) -> bool {
        self.rank == 0
    }

    pub fn global_size(&self) -> usize {
        self.ctx.size()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn local_len(&self) -> usize {
        self.end - self.start
    }

    pub fn singularity_policy(&self) -> SingularityPolicy {
        self.ctx.singularity()
    }

    /// Team barrier. Every worker must call it the same number of times.
    pub fn wait(&self) {
        self.ctx.wait();
    }

    /// Run `f` and then wait for the rest of the team.
    ///
    /// Pairs a step with the barrier that publishes its writes, so callers do
    /// not have to keep separate `wait` calls balanced.
    pub fn phase<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let out = f(self);
        self.wait();
        out
    }

    /// A zeroed vector of `global_size` entries shared by the team.
    ///
    /// Every worker must request scratch vectors in the same order: the k-th
    /// request on each worker returns the same storage. The vector lives until
    /// the invocation ends.
    pub fn new_vector(&mut self) -> SharedVector<'s, T> {
        let index = self.allocated;
        self.allocated += 1;
        self.ctx.scratch_vector(index)
    }

    /// Fail unless `found` covers `expected` entries. Every worker sees the
    /// same lengths, so the check fails on the whole team or on nobody.
    pub(crate) fn expect_len(
        &self,
        what: &'static str,
        expected: usize,
        found: usize,
    ) -> Result<(), PlaError> {
        if found < expected {
            Err(PlaError::DimensionMismatch { what, expected, found })
        } else {
            Ok(())
        }
    }

    pub(crate) fn record(&self, succeeded: bool) {
        // SAFETY: one view exists per rank, so this worker owns the slot.
        unsafe {
            if succeeded {
                self.ctx.set_success(self.rank);
            } else {
                self.ctx.set_fail(self.rank);
            }
        }
    }
}
