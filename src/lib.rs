//! parla: barrier-synchronized SPMD linear algebra over shared memory
//!
//! A fixed-size team of workers partitions one global index space. Each
//! worker runs the same callback against its [`WorkerView`], applying vector
//! and sparse kernels to its own partition and meeting its peers at barriers
//! and collective reductions. Iterative solvers are written as such callbacks.
//!
//! ```rust,no_run
//! use parla::{CsrMatrix, LinearSystem, run_parallel};
//!
//! let a = CsrMatrix::<f64>::identity(1000);
//! let b = vec![1.0; 1000];
//! let x0 = vec![0.0; 1000];
//! let mut x = vec![0.0; 1000];
//! let sys = LinearSystem::new(&a, &b, &x0, &mut x);
//! let ok = run_parallel(&sys, 4, |pla, sys| {
//!     pla.spmv(sys.matrix, sys.rhs, &sys.solution)?;
//!     let norm = pla.norm(&sys.solution)?;
//!     if pla.first() {
//!         println!("|Ab| = {norm}");
//!     }
//!     Ok::<(), parla::PlaError>(())
//! });
//! assert!(ok);
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod parallel;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::context::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::matrix::*;
pub use crate::parallel::*;
