//! Problem payloads handed to every worker of a team.

use num_traits::Float;

use crate::core::SharedVector;
use crate::error::PlaError;
use crate::matrix::CsrMatrix;

/// Input shared by the whole team.
///
/// `problem_size` validates the payload and returns the length of the global
/// index space. It runs single-threaded before any worker starts; an error
/// stops the invocation with no thread launched.
pub trait Problem: Sync {
    type Scalar: Float + Send + Sync;

    fn problem_size(&self) -> Result<usize, PlaError>;
}

/// `A x = b` with an initial guess, the standing payload of iterative solvers.
///
/// Vectors and matrix rows share the index space. The column count is free;
/// kernels that gather over columns check their input lengths themselves.
pub struct LinearSystem<'a, T> {
    pub matrix: &'a CsrMatrix<T>,
    pub rhs: &'a [T],
    pub initial_guess: &'a [T],
    pub solution: SharedVector<'a, T>,
}

impl<'a, T: Float> LinearSystem<'a, T> {
    pub fn new(
        matrix: &'a CsrMatrix<T>,
        rhs: &'a [T],
        initial_guess: &'a [T],
        solution: &'a mut [T],
    ) -> Self {
        Self {
            matrix,
            rhs,
            initial_guess,
            solution: SharedVector::new(solution),
        }
    }
}

impl<T: Float + Send + Sync> Problem for LinearSystem<'_, T> {
    type Scalar = T;

    fn problem_size(&self) -> Result<usize, PlaError> {
        let n = self.rhs.len();
        let check = |what: &'static str, found: usize| {
            if found == n {
                Ok(())
            } else {
                Err(PlaError::DimensionMismatch { what, expected: n, found })
            }
        };
        check("solution", self.solution.len())?;
        check("initial guess", self.initial_guess.len())?;
        check("matrix rows", self.matrix.nrows())?;
        Ok(n)
    }
}

/// Vectors of one common length, for algorithms without a matrix.
pub struct VectorSet<'a, T> {
    pub inputs: Vec<&'a [T]>,
    pub outputs: Vec<SharedVector<'a, T>>,
}

impl<T: Float + Send + Sync> Problem for VectorSet<'_, T> {
    type Scalar = T;

    fn problem_size(&self) -> Result<usize, PlaError> {
        let mut lengths = self
            .inputs
            .iter()
            .map(|v| v.len())
            .chain(self.outputs.iter().map(SharedVector::len));
        let n = lengths.next().ok_or(PlaError::EmptyProblem)?;
        match lengths.find(|&len| len != n) {
            Some(found) => Err(PlaError::DimensionMismatch {
                what: "vector set",
                expected: n,
                found,
            }),
            None => Ok(n),
        }
    }
}
