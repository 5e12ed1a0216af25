//! Shared-memory building blocks: operand access and team-shared storage.

pub mod shared;
pub mod traits;

pub use shared::SharedVector;
pub use traits::Operand;
