//! Team configuration.

pub mod options;
pub use options::{SingularityPolicy, TeamOptions, MIN_PARTITION_SIZE};
