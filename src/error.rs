use thiserror::Error;

// Unified error type for parla

#[derive(Error, Debug)]
pub enum PlaError {
    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("problem has no vectors to partition")]
    EmptyProblem,
    #[error("invalid CSR structure: {0}")]
    InvalidCsr(String),
    #[error("output vector aliases the gathered input in {0}")]
    AliasedOperands(&'static str),
    #[error("numeric singularity: {count} entries fell below the inversion threshold")]
    NumericSingularity { count: usize },
    #[error("worker callback failed on ranks {failed:?}")]
    WorkerFailure { failed: Vec<usize> },
    #[cfg(feature = "rayon")]
    #[error("failed to configure worker pool")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),
}
