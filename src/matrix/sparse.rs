// Row-compressed sparse matrix backed by faer

use faer::sparse::{
    SparseRowMat,            // owning numeric CSR alias
    SymbolicSparseRowMat,    // owning symbolic CSR alias
};
use faer::traits::ComplexField;
use num_traits::Zero;

use crate::error::PlaError;

/// A compressed sparse row matrix.
///
/// Column indices are sorted within each row and free of duplicates. The
/// transpose kernel relies on that order to clip each row to the columns a
/// worker owns, so compression happens here, single-threaded, before any
/// team touches the matrix.
pub struct CsrMatrix<T> {
    inner: SparseRowMat<usize, T>,
}

impl<T: Copy + Zero + std::ops::Add<Output = T>> CsrMatrix<T> {
    /// Build a CSR from raw row‐ptr, col‐idx, and values.
    ///
    /// Rows may list their columns in any order and repeat a column; repeats
    /// are summed.
    pub fn from_csr(
        nrows: usize,
        ncols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, PlaError> {
        if row_ptr.len() != nrows + 1 {
            return Err(PlaError::InvalidCsr(format!(
                "row_ptr has {} entries, expected {}",
                row_ptr.len(),
                nrows + 1
            )));
        }
        if row_ptr[0] != 0 {
            return Err(PlaError::InvalidCsr("row_ptr must start at 0".into()));
        }
        if let Some(row) = row_ptr.windows(2).position(|w| w[0] > w[1]) {
            return Err(PlaError::InvalidCsr(format!("row_ptr decreases at row {row}")));
        }
        let nnz = row_ptr[nrows];
        if col_idx.len() != nnz || values.len() != nnz {
            return Err(PlaError::InvalidCsr(format!(
                "expected {nnz} entries, got {} column indices and {} values",
                col_idx.len(),
                values.len()
            )));
        }
        if let Some(&col) = col_idx.iter().find(|&&c| c >= ncols) {
            return Err(PlaError::InvalidCsr(format!(
                "column index {col} out of bounds for {ncols} columns"
            )));
        }

        // Compress: sort each row by column and merge repeats.
        let mut new_ptr = Vec::with_capacity(nrows + 1);
        let mut new_cols = Vec::with_capacity(nnz);
        let mut new_vals = Vec::with_capacity(nnz);
        new_ptr.push(0);
        let mut row: Vec<(usize, T)> = Vec::new();
        for i in 0..nrows {
            row.clear();
            row.extend((row_ptr[i]..row_ptr[i + 1]).map(|j| (col_idx[j], values[j])));
            row.sort_by_key(|&(c, _)| c);
            let row_start = new_cols.len();
            for &(c, v) in &row {
                if new_cols.len() > row_start && new_cols.last() == Some(&c) {
                    if let Some(acc) = new_vals.last_mut() {
                        *acc = *acc + v;
                    }
                } else {
                    new_cols.push(c);
                    new_vals.push(v);
                }
            }
            new_ptr.push(new_cols.len());
        }

        // Build symbolic structure; second argument `None` means “no separate row_nnz”:
        let symbolic = SymbolicSparseRowMat::new_checked(nrows, ncols, new_ptr, None, new_cols);
        // Attach the numerical values:
        let inner = SparseRowMat::new(symbolic, new_vals);
        Ok(Self { inner })
    }

    /// Build a CSR from `(row, col, value)` entries; repeats are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        triplets: &[(usize, usize, T)],
    ) -> Result<Self, PlaError> {
        if let Some(&(r, _, _)) = triplets.iter().find(|&&(r, _, _)| r >= nrows) {
            return Err(PlaError::InvalidCsr(format!(
                "row index {r} out of bounds for {nrows} rows"
            )));
        }
        let mut row_ptr = vec![0; nrows + 1];
        for &(r, _, _) in triplets {
            row_ptr[r + 1] += 1;
        }
        for i in 0..nrows {
            row_ptr[i + 1] += row_ptr[i];
        }
        let mut next = row_ptr.clone();
        let mut col_idx = vec![0; triplets.len()];
        let mut values = vec![T::zero(); triplets.len()];
        for &(r, c, v) in triplets {
            col_idx[next[r]] = c;
            values[next[r]] = v;
            next[r] += 1;
        }
        Self::from_csr(nrows, ncols, row_ptr, col_idx, values)
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self
    where
        T: num_traits::One,
    {
        let inner = SparseRowMat::new(
            SymbolicSparseRowMat::new_checked(n, n, (0..=n).collect(), None, (0..n).collect()),
            vec![T::one(); n],
        );
        Self { inner }
    }
}

impl<T> CsrMatrix<T> {
    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }
    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }
    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.row_ptr()[self.nrows()]
    }
    /// Offsets of each row into `col_idx`/`values`, `nrows + 1` entries.
    pub fn row_ptr(&self) -> &[usize] {
        self.inner.symbolic().row_ptr()
    }
    /// Column of each stored entry, sorted within a row.
    pub fn col_idx(&self) -> &[usize] {
        self.inner.symbolic().col_idx()
    }
    /// Value of each stored entry.
    pub fn values(&self) -> &[T] {
        self.inner.val()
    }

    /// Columns and values of row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_ptr()[i]..self.row_ptr()[i + 1];
        (&self.col_idx()[range.clone()], &self.values()[range])
    }
}

impl<T: ComplexField + Copy> CsrMatrix<T> {
    /// Dense copy, for checks and small problems.
    pub fn to_dense(&self) -> faer::Mat<T> {
        self.inner.to_dense()
    }
}

impl<T> std::fmt::Debug for CsrMatrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrMatrix")
            .field("nrows", &self.nrows())
            .field("ncols", &self.ncols())
            .field("nnz", &self.nnz())
            .finish()
    }
}
