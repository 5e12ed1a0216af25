//! Matrix module: the row-compressed sparse matrix the kernels consume.

pub mod sparse;
pub use sparse::CsrMatrix;
