//! Core access traits for parla.

/// Read access to a vector that kernels consume.
///
/// Implemented for plain slices, which nobody writes during an invocation,
/// and for [`SharedVector`](crate::core::shared::SharedVector), which the team
/// writes partition by partition.
pub trait Operand<T> {
    /// Number of entries.
    fn len(&self) -> usize;
    /// Start of the storage, used to detect aliasing.
    fn as_ptr(&self) -> *const T;
    /// Read entry `i`.
    ///
    /// # Safety
    /// `i` must be below `len()`, and no other worker may be writing entry `i`
    /// concurrently. Entries inside the calling worker's partition always
    /// satisfy the latter; entries elsewhere only between two barriers that
    /// nobody writes across.
    unsafe fn load(&self, i: usize) -> T;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy> Operand<T> for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
    fn as_ptr(&self) -> *const T {
        <[T]>::as_ptr(self)
    }
    unsafe fn load(&self, i: usize) -> T {
        self[i]
    }
}

impl<T: Copy> Operand<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn as_ptr(&self) -> *const T {
        Vec::as_ptr(self)
    }
    unsafe fn load(&self, i: usize) -> T {
        self[i]
    }
}
