//! Sparse storage and a skyline Cholesky solver for banded stiffness matrices
//!
//! A line of two-node elements gives a stiffness matrix whose half-bandwidth is
//! `2D - 1`, so the skyline profile stays narrow no matter how many elements
//! the mesh has.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::{FemError, FemResult};

use super::PIVOT_TOLERANCE;

/// Sparse matrix builder using COO format
/// More efficient for incremental assembly
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // Banded 1-D connectivity: at most 4 DOFs either side of the diagonal
        let estimated_nnz = size * 8;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Convert to CSR format for efficient solves
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Convert to dense matrix (for comparison/debugging)
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    /// Get estimated non-zero count
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Get sparsity ratio
    pub fn sparsity(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let total = self.size * self.size;
        1.0 - (self.entries.len() as f64 / total as f64)
    }
}

/// Skyline Cholesky factorization for symmetric positive definite matrices
///
/// Only the lower profile of each row is stored, from the first non-zero
/// column up to the diagonal.
pub struct SkylineCholesky {
    size: usize,
    // Row profiles, each ending with the diagonal entry
    skyline: Vec<Vec<f64>>,
    // Distance from the diagonal to the first stored column of each row
    heights: Vec<usize>,
    // Diagonal before factorization, for the relative pivot check
    original_diagonal: Vec<f64>,
    factorized: bool,
}

impl SkylineCholesky {
    /// Create solver storage from the lower triangle of a CSR matrix
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                heights[row] = heights[row].max(row - col);
            }
        }

        let mut skyline: Vec<Vec<f64>> = heights.iter().map(|&h| vec![0.0; h + 1]).collect();

        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                let idx = col - (row - heights[row]);
                skyline[row][idx] += val;
            }
        }

        let original_diagonal = (0..size).map(|i| skyline[i][heights[i]]).collect();

        Self {
            size,
            skyline,
            heights,
            original_diagonal,
            factorized: false,
        }
    }

    /// Number of stored entries in the profile
    pub fn profile_len(&self) -> usize {
        self.skyline.iter().map(|row| row.len()).sum()
    }

    /// Factorize in place into L with A = L * L^T
    pub fn factorize(&mut self) -> FemResult<()> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            for j in start_i..i {
                let hj = self.heights[j];
                let start_j = j - hj;

                let start = start_i.max(start_j);
                let mut sum = 0.0;
                for k in start..j {
                    sum += self.get(i, k) * self.get(j, k);
                }

                let diag_j = self.skyline[j][hj];
                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / diag_j;
            }

            let mut sum = 0.0;
            for j in start_i..i {
                let val = self.get(i, j);
                sum += val * val;
            }

            let pivot = self.skyline[i][hi] - sum;
            if !(pivot > PIVOT_TOLERANCE * self.original_diagonal[i].abs()) {
                return Err(FemError::SingularSystem(format!(
                    "non-positive pivot {:e} at reduced DOF {}; the supports do not restrain every rigid-body mode",
                    pivot, i
                )));
            }
            self.skyline[i][hi] = pivot.sqrt();
        }

        self.factorized = true;
        Ok(())
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        if col > row {
            return self.get(col, row);
        }
        let h = self.heights[row];
        let start = row - h;
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Solve L * L^T * x = b with the factorized profile
    pub fn solve(&self, b: &DVector<f64>) -> FemResult<DVector<f64>> {
        if !self.factorized {
            return Err(FemError::InvalidInput(
                "skyline solve called before factorize".to_string(),
            ));
        }

        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let start = i - self.heights[i];

            let mut sum = 0.0;
            for j in start..i {
                sum += self.get(i, j) * x[j];
            }

            x[i] = (x[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);

            let start = i - self.heights[i];
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize) -> SparseMatrixBuilder {
        let mut builder = SparseMatrixBuilder::new(n);
        for i in 0..n {
            builder.add(i, i, 4.0);
            if i + 1 < n {
                builder.add(i, i + 1, -1.0);
                builder.add(i + 1, i, -1.0);
            }
        }
        builder
    }

    #[test]
    fn test_sparse_builder_accumulates() {
        let mut builder = SparseMatrixBuilder::new(2);
        builder.add(0, 0, 4.0);
        builder.add(0, 0, 1.0);
        builder.add(1, 1, 0.0);

        let dense = builder.to_dense();
        assert_eq!(dense[(0, 0)], 5.0);
        assert_eq!(builder.nnz(), 2);
        assert!((builder.sparsity() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_skyline_profile_is_banded() {
        let solver = SkylineCholesky::new(&tridiagonal(10).to_csr());
        // One sub-diagonal entry per row plus the diagonal
        assert_eq!(solver.profile_len(), 19);
    }

    #[test]
    fn test_skyline_solve_matches_dense() {
        let builder = tridiagonal(6);
        let mut solver = SkylineCholesky::new(&builder.to_csr());
        solver.factorize().unwrap();

        let b = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let x = solver.solve(&b).unwrap();

        let residual = builder.to_dense() * &x - &b;
        assert!(residual.norm() < 1e-12, "residual: {}", residual.norm());
    }

    #[test]
    fn test_skyline_rejects_singular() {
        // Free-free spring chain: constant vector in the null space
        let mut builder = SparseMatrixBuilder::new(3);
        for (i, j) in [(0, 1), (1, 2)] {
            builder.add(i, i, 1.0);
            builder.add(j, j, 1.0);
            builder.add(i, j, -1.0);
            builder.add(j, i, -1.0);
        }
        let mut solver = SkylineCholesky::new(&builder.to_csr());
        assert!(matches!(solver.factorize(), Err(FemError::SingularSystem(_))));
    }

    #[test]
    fn test_solve_before_factorize_is_an_error() {
        let solver = SkylineCholesky::new(&tridiagonal(2).to_csr());
        let b = DVector::from_vec(vec![1.0, 1.0]);
        assert!(solver.solve(&b).is_err());
    }
}
