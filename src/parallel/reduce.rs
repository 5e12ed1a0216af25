//! Collective reductions over the double-buffered scratch arrays.
//!
//! A reduction writes the local value into this worker's slot of the active
//! buffer, flips the view's buffer index, waits once, and folds the whole
//! buffer. The next reduction writes into the other buffer, so it cannot
//! clobber slots a slower peer is still folding; the one after that reuses
//! the first buffer, but only once every peer has passed the intervening
//! barrier and therefore finished folding it.

use num_traits::Float;

use super::{Comm, WorkerView};

/// Combining operator of a collective reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Sum,
    Max,
    Min,
}

impl ReduceOp {
    /// Value folded with an empty set of inputs.
    pub fn identity<T: Float>(self) -> T {
        match self {
            ReduceOp::Sum => T::zero(),
            ReduceOp::Max => -T::max_value(),
            ReduceOp::Min => T::max_value(),
        }
    }

    pub fn combine<T: Float>(self, acc: T, value: T) -> T {
        match self {
            ReduceOp::Sum => acc + value,
            ReduceOp::Max => {
                if value > acc { value } else { acc }
            }
            ReduceOp::Min => {
                if value < acc { value } else { acc }
            }
        }
    }
}

impl<T: Float + Send + Sync> WorkerView<'_, T> {
    /// Combine one value per worker; every worker gets the same result.
    pub fn reduce(&mut self, local: T, op: ReduceOp) -> T {
        let buffer = self.ctx.reduction_buffer(self.active);
        // SAFETY: slot `rank` belongs to this worker, and no peer reads this
        // buffer until the barrier below.
        unsafe { buffer.write(self.rank, local) };
        self.active ^= 1;
        self.ctx.wait();
        (0..buffer.len()).fold(op.identity(), |acc, j| {
            // SAFETY: every slot was written before the barrier, and nobody
            // writes this buffer again until after the next barrier.
            op.combine(acc, unsafe { buffer.read(j) })
        })
    }

    pub fn reduce_sum(&mut self, local: T) -> T {
        self.reduce(local, ReduceOp::Sum)
    }

    pub fn reduce_max(&mut self, local: T) -> T {
        self.reduce(local, ReduceOp::Max)
    }

    pub fn reduce_min(&mut self, local: T) -> T {
        self.reduce(local, ReduceOp::Min)
    }
}

impl<T: Float + Send + Sync> Comm<T> for WorkerView<'_, T> {
    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.ctx.workers()
    }
    fn barrier(&self) {
        self.ctx.wait();
    }
    fn all_reduce(&mut self, x: T, op: ReduceOp) -> T {
        self.reduce(x, op)
    }
}
