//! Sparse matrix-vector kernels over row-compressed matrices.
//!
//! `spmv` and `spmv_transpose` gather from the whole input vector, not just
//! the worker's partition. They wait for the team before the gather, so the
//! input is complete, and again after it, so no peer starts overwriting the
//! input while someone still reads it. Shape and aliasing checks run before
//! the first barrier and fail identically on every worker.

use num_traits::Float;

use crate::core::{Operand, SharedVector};
use crate::error::PlaError;
use crate::matrix::CsrMatrix;
use crate::parallel::WorkerView;

impl<T: Float + Send + Sync> WorkerView<'_, T> {
    fn expect_disjoint<X>(
        &self,
        kernel: &'static str,
        x: &X,
        y: &SharedVector<'_, T>,
    ) -> Result<(), PlaError>
    where
        X: Operand<T> + ?Sized,
    {
        let size = std::mem::size_of::<T>();
        let xs = x.as_ptr() as usize;
        let ys = Operand::as_ptr(y) as usize;
        let overlap = xs < ys + y.len() * size && ys < xs + x.len() * size;
        if overlap && !x.is_empty() && !y.is_empty() {
            Err(PlaError::AliasedOperands(kernel))
        } else {
            Ok(())
        }
    }

    /// y = A x, each worker computing the rows it owns.
    pub fn spmv<X>(
        &mut self,
        a: &CsrMatrix<T>,
        x: &X,
        y: &SharedVector<'_, T>,
    ) -> Result<(), PlaError>
    where
        X: Operand<T> + ?Sized,
    {
        if a.nrows() != self.global_size() {
            return Err(PlaError::DimensionMismatch {
                what: "spmv matrix rows",
                expected: self.global_size(),
                found: a.nrows(),
            });
        }
        self.expect_len("spmv input", a.ncols(), x.len())?;
        self.expect_len("spmv output", a.nrows(), y.len())?;
        self.expect_disjoint("spmv", x, y)?;

        self.wait();
        let (row_ptr, col_idx, values) = (a.row_ptr(), a.col_idx(), a.values());
        for i in self.start..self.end {
            let mut sum = T::zero();
            for j in row_ptr[i]..row_ptr[i + 1] {
                // SAFETY: nobody writes `x` between the two barriers.
                sum = sum + values[j] * unsafe { x.load(col_idx[j]) };
            }
            // SAFETY: row `i` lies in this worker's partition.
            unsafe { y.store(i, sum) };
        }
        self.wait();
        Ok(())
    }

    /// y = Aᵀ x.
    ///
    /// Output entry `c` receives contributions from every row, so rows are not
    /// split among workers. Instead each worker scans all rows, clipped to the
    /// columns it owns, and accumulates only into its own part of `y`.
    pub fn spmv_transpose<X>(
        &mut self,
        a: &CsrMatrix<T>,
        x: &X,
        y: &SharedVector<'_, T>,
    ) -> Result<(), PlaError>
    where
        X: Operand<T> + ?Sized,
    {
        if a.ncols() != self.global_size() {
            return Err(PlaError::DimensionMismatch {
                what: "transpose spmv matrix columns",
                expected: self.global_size(),
                found: a.ncols(),
            });
        }
        self.expect_len("transpose spmv input", a.nrows(), x.len())?;
        self.expect_len("transpose spmv output", a.ncols(), y.len())?;
        self.expect_disjoint("spmv_transpose", x, y)?;

        self.wait();
        let (start, end) = (self.start, self.end);
        for c in start..end {
            // SAFETY: column `c` lies in this worker's partition.
            unsafe { y.store(c, T::zero()) };
        }
        for row in 0..a.nrows() {
            // SAFETY: nobody writes `x` between the two barriers.
            let xr = unsafe { x.load(row) };
            if xr == T::zero() {
                continue;
            }
            let (cols, vals) = a.row(row);
            let first = cols.partition_point(|&c| c < start);
            for (&c, &v) in cols[first..].iter().zip(&vals[first..]) {
                if c >= end {
                    break;
                }
                // SAFETY: column `c` lies in this worker's partition.
                unsafe { y.store(c, y.load(c) + v * xr) };
            }
        }
        self.wait();
        Ok(())
    }

    /// d = diag(A) for the rows this worker owns; missing diagonals read 0.
    pub fn diag(&self, a: &CsrMatrix<T>, d: &SharedVector<'_, T>) -> Result<(), PlaError> {
        self.diag_with(a, d, |v| v)
    }

    /// d = |diag(A)| for the rows this worker owns.
    pub fn abs_diag(&self, a: &CsrMatrix<T>, d: &SharedVector<'_, T>) -> Result<(), PlaError> {
        self.diag_with(a, d, T::abs)
    }

    fn diag_with(
        &self,
        a: &CsrMatrix<T>,
        d: &SharedVector<'_, T>,
        f: impl Fn(T) -> T,
    ) -> Result<(), PlaError> {
        if a.nrows() != self.global_size() {
            return Err(PlaError::DimensionMismatch {
                what: "diagonal matrix rows",
                expected: self.global_size(),
                found: a.nrows(),
            });
        }
        self.expect_len("diagonal output", a.nrows(), d.len())?;
        for i in self.start..self.end {
            let (cols, vals) = a.row(i);
            let value = cols
                .iter()
                .position(|&c| c == i)
                .map_or(T::zero(), |k| vals[k]);
            // SAFETY: row `i` lies in this worker's partition.
            unsafe { d.store(i, f(value)) };
        }
        Ok(())
    }
}
