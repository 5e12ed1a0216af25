//! Kernels run by each worker of a team, as methods of
//! [`WorkerView`](crate::parallel::WorkerView).
//!
//! - [`vector`]: copy, fill, pointwise arithmetic, inversion, reductions
//! - [`sparse`]: CSR matrix-vector product, its transpose, diagonal extraction

pub mod sparse;
pub mod vector;
