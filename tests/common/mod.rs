//! Helpers shared by the integration tests: logger setup, random inputs and
//! serial reference products.
#![allow(dead_code)]

use parla::CsrMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Route `log` output through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deterministic random vector with entries in [-1, 1).
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Random `nrows × ncols` sparse matrix with about `per_row` entries per row.
pub fn random_sparse(nrows: usize, ncols: usize, per_row: usize, seed: u64) -> CsrMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut triplets = Vec::with_capacity(nrows * per_row);
    for i in 0..nrows {
        for _ in 0..per_row {
            triplets.push((i, rng.gen_range(0..ncols), rng.gen_range(-1.0..1.0)));
        }
    }
    CsrMatrix::from_triplets(nrows, ncols, &triplets).unwrap()
}

/// SPD tridiagonal matrix with 2 on the diagonal and -1 off it.
pub fn laplacian_1d(n: usize) -> CsrMatrix<f64> {
    let mut triplets = Vec::with_capacity(3 * n);
    for i in 0..n {
        triplets.push((i, i, 2.0));
        if i > 0 {
            triplets.push((i, i - 1, -1.0));
        }
        if i + 1 < n {
            triplets.push((i, i + 1, -1.0));
        }
    }
    CsrMatrix::from_triplets(n, n, &triplets).unwrap()
}

/// y = A x through faer's dense representation.
pub fn dense_matvec(a: &CsrMatrix<f64>, x: &[f64]) -> Vec<f64> {
    let d = a.to_dense();
    (0..d.nrows())
        .map(|i| (0..d.ncols()).map(|j| d[(i, j)] * x[j]).sum())
        .collect()
}

/// y = Aᵀ x through faer's dense representation.
pub fn dense_matvec_transpose(a: &CsrMatrix<f64>, x: &[f64]) -> Vec<f64> {
    let d = a.to_dense();
    (0..d.ncols())
        .map(|j| (0..d.nrows()).map(|i| d[(i, j)] * x[i]).sum())
        .collect()
}

pub fn serial_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
