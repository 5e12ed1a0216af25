//! Shared execution context of one team invocation.
//!
//! Holds everything the workers of a team share: the barrier, the two
//! reduction buffers, one success flag per worker and the arena of scratch
//! vectors allocated during the invocation. The context is created by the
//! driver before launch and dropped after every worker has joined.

use std::ptr::NonNull;
use std::sync::{Barrier, Mutex, PoisonError};

use num_traits::Float;

use crate::config::{SingularityPolicy, TeamOptions};
use crate::core::shared::{SharedVector, SlotArray};

pub struct ExecContext<T> {
    size: usize,
    workers: usize,
    singularity: SingularityPolicy,
    barrier: Barrier,
    /// Ping and pong reduction buffers, one slot per worker each
    reduce: [SlotArray<T>; 2],
    success: SlotArray<bool>,
    scratch: Mutex<Vec<Vec<T>>>,
}

impl<T: Float + Send + Sync> ExecContext<T> {
    pub fn new(size: usize, workers: usize, options: &TeamOptions) -> Self {
        assert!(workers > 0, "a team needs at least one worker");
        Self {
            size,
            workers,
            singularity: options.singularity,
            barrier: Barrier::new(workers),
            reduce: [
                SlotArray::new(workers, T::zero()),
                SlotArray::new(workers, T::zero()),
            ],
            success: SlotArray::new(workers, false),
            scratch: Mutex::new(Vec::new()),
        }
    }

    /// Length of the global index space.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of workers in the team.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn singularity(&self) -> SingularityPolicy {
        self.singularity
    }

    /// Block until every worker of the team has called `wait` as many times.
    pub fn wait(&self) {
        self.barrier.wait();
    }

    pub(crate) fn reduction_buffer(&self, which: usize) -> &SlotArray<T> {
        &self.reduce[which]
    }

    /// # Safety
    /// Only worker `rank` may call this for `rank`.
    pub(crate) unsafe fn set_success(&self, rank: usize) {
        unsafe { self.success.write(rank, true) }
    }

    /// # Safety
    /// Only worker `rank` may call this for `rank`.
    pub(crate) unsafe fn set_fail(&self, rank: usize) {
        unsafe { self.success.write(rank, false) }
    }

    /// Logical AND of the success flags. Exclusive access means the team
    /// has joined.
    pub fn all_succeeded(&mut self) -> bool {
        self.success.iter_mut().all(|ok| ok)
    }

    /// Ranks whose success flag is not set.
    pub fn failed_workers(&mut self) -> Vec<usize> {
        self.success
            .iter_mut()
            .enumerate()
            .filter_map(|(rank, ok)| (!ok).then_some(rank))
            .collect()
    }

    /// Scratch vector number `index`, allocating it zeroed on first request.
    ///
    /// Every worker asks for the same indices in the same order, so whichever
    /// worker comes first allocates and the others receive the same storage.
    pub(crate) fn scratch_vector(&self, index: usize) -> SharedVector<'_, T> {
        let mut arena = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        while arena.len() <= index {
            log::trace!("allocating scratch vector {} of length {}", arena.len(), self.size);
            arena.push(vec![T::zero(); self.size]);
        }
        let storage = &mut arena[index];
        let len = storage.len();
        let ptr = NonNull::new(storage.as_mut_ptr()).unwrap_or(NonNull::dangling());
        // SAFETY: the arena only grows while the context lives, and growing
        // moves the `Vec` headers, never their heap buffers.
        unsafe { SharedVector::from_raw_parts(ptr, len) }
    }
}
