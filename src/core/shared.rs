//! Memory shared by every worker of a team.
//!
//! Two shapes of sharing exist. A [`SharedVector`] is a caller- or
//! team-owned vector that all workers write at once, each inside its own
//! partition. A [`SlotArray`] holds one value per worker (reduction scratch,
//! success flags); worker `i` writes slot `i` only.
//!
//! Neither type hands out references to its elements. Kernels read and write
//! single entries through raw pointers, so a destination may alias a source
//! without two live references overlapping.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::core::traits::Operand;

/// A vector written concurrently by a team, one partition per worker.
pub struct SharedVector<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _borrow: PhantomData<&'a mut [T]>,
}

// SAFETY: the handle only moves raw element accesses between threads. Each
// worker writes the entries of its own partition, and cross-partition reads
// happen behind barriers (see the sparse kernels).
unsafe impl<T: Send> Send for SharedVector<'_, T> {}
unsafe impl<T: Send + Sync> Sync for SharedVector<'_, T> {}

impl<T> Clone for SharedVector<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SharedVector<'_, T> {}

impl<'a, T: Copy> SharedVector<'a, T> {
    /// Share `data` with the team for as long as the handle lives.
    pub fn new(data: &'a mut [T]) -> Self {
        let len = data.len();
        Self {
            ptr: NonNull::from(data).cast(),
            len,
            _borrow: PhantomData,
        }
    }

    /// # Safety
    /// `ptr` must be valid for reads and writes of `len` entries for `'a`,
    /// and not be accessed through references while the handle is in use.
    pub(crate) unsafe fn from_raw_parts(ptr: NonNull<T>, len: usize) -> Self {
        Self {
            ptr,
            len,
            _borrow: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Write entry `i`.
    ///
    /// # Safety
    /// `i` must be below `len()` and lie in the calling worker's partition,
    /// and no other worker may be reading entry `i` at the same time.
    pub unsafe fn store(&self, i: usize, value: T) {
        debug_assert!(i < self.len, "index {i} out of bounds for length {}", self.len);
        unsafe { self.ptr.as_ptr().add(i).write(value) }
    }
}

impl<T: Copy> Operand<T> for SharedVector<'_, T> {
    fn len(&self) -> usize {
        self.len
    }
    fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
    unsafe fn load(&self, i: usize) -> T {
        debug_assert!(i < self.len, "index {i} out of bounds for length {}", self.len);
        unsafe { self.ptr.as_ptr().add(i).read() }
    }
}

/// One value per worker.
pub(crate) struct SlotArray<T> {
    slots: Box<[UnsafeCell<T>]>,
}

// SAFETY: slot `i` is written only by worker `i`; other workers read it only
// after a barrier that follows the write.
unsafe impl<T: Send> Sync for SlotArray<T> {}

impl<T: Copy> SlotArray<T> {
    pub(crate) fn new(len: usize, init: T) -> Self {
        Self {
            slots: (0..len).map(|_| UnsafeCell::new(init)).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// # Safety
    /// Only the owner of slot `i` writes it, and nobody reads it concurrently.
    pub(crate) unsafe fn write(&self, i: usize, value: T) {
        unsafe { *self.slots[i].get() = value }
    }

    /// # Safety
    /// The last write to slot `i` must happen-before this read.
    pub(crate) unsafe fn read(&self, i: usize) -> T {
        unsafe { *self.slots[i].get() }
    }

    /// Exclusive access proves every writer is done.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = T> + '_ {
        self.slots.iter_mut().map(|slot| *slot.get_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_vector_writes_land_in_borrowed_slice() {
        let mut data = vec![0.0; 4];
        {
            let v = SharedVector::new(&mut data);
            for i in 0..4 {
                unsafe { v.store(i, i as f64 * 2.0) };
            }
            assert_eq!(unsafe { v.load(3) }, 6.0);
        }
        assert_eq!(data, vec![0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn slot_array_reads_back_after_exclusive_access() {
        let mut slots = SlotArray::new(3, false);
        unsafe { slots.write(1, true) };
        assert_eq!(slots.len(), 3);
        let values: Vec<bool> = slots.iter_mut().collect();
        assert_eq!(values, vec![false, true, false]);
    }
}
