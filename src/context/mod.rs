//! Per-invocation state: the shared execution context and the payloads the
//! team works on.

pub mod exec;
pub use exec::ExecContext;
pub mod problem;
pub use problem::{LinearSystem, Problem, VectorSet};
