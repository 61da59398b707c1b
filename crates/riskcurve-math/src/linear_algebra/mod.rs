//! Linear algebra utilities.
//!
//! This module provides the matrix operations needed by the curve fitter
//! (damped normal equations) and the factor decomposition (covariance and
//! symmetric eigen-decomposition).

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Performs LU decomposition of a square matrix.
///
/// Returns matrices L and U such that A = L * U, where L is lower
/// triangular and U is upper triangular. No pivoting is performed, so the
/// routine is intended for diagonally dominant or positive definite systems
/// such as damped normal equations.
pub fn lu_decomposition(matrix: &DMatrix<f64>) -> MathResult<(DMatrix<f64>, DMatrix<f64>)> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(MathError::invalid_input(
            "Matrix must be square for LU decomposition",
        ));
    }

    let mut l = DMatrix::identity(n, n);
    let mut u = matrix.clone();

    for k in 0..n {
        if u[(k, k)].abs() < 1e-300 {
            return Err(MathError::SingularMatrix);
        }

        for i in k + 1..n {
            let factor = u[(i, k)] / u[(k, k)];
            l[(i, k)] = factor;

            for j in k..n {
                u[(i, j)] -= factor * u[(k, j)];
            }
        }
    }

    Ok((l, u))
}

/// Solves a linear system Ax = b using LU decomposition.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input("Matrix must be square"));
    }
    if n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: n,
            cols1: n,
            rows2: b.len(),
            cols2: 1,
        });
    }

    let (l, u) = lu_decomposition(a)?;

    // Solve Ly = b (forward substitution)
    let mut y = DVector::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[(i, j)] * y[j];
        }
        y[i] = sum / l[(i, i)];
    }

    // Solve Ux = y (back substitution)
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in i + 1..n {
            sum -= u[(i, j)] * x[j];
        }
        x[i] = sum / u[(i, i)];
    }

    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::SingularMatrix);
    }

    Ok(x)
}

/// Sample covariance matrix of the columns of `data` (rows are observations).
///
/// Uses the `n - 1` denominator.
pub fn covariance_matrix(data: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let n = data.nrows();
    if n < 2 {
        return Err(MathError::insufficient_data(2, n));
    }

    let mut centered = data.clone();
    for mut column in centered.column_iter_mut() {
        let mean = column.mean();
        column.add_scalar_mut(-mean);
    }

    Ok(centered.transpose() * &centered / (n - 1) as f64)
}

/// Eigenvalues and eigenvectors of a symmetric matrix, largest eigenvalue first.
#[derive(Debug, Clone)]
pub struct EigenPairs {
    /// Eigenvalues in descending order.
    pub values: Vec<f64>,
    /// Unit eigenvectors, `vectors[i]` belongs to `values[i]`.
    pub vectors: Vec<Vec<f64>>,
}

/// Eigen-decomposition of a symmetric matrix with eigenpairs sorted by
/// descending eigenvalue.
pub fn symmetric_eigen_sorted(matrix: &DMatrix<f64>) -> MathResult<EigenPairs> {
    if !matrix.is_square() {
        return Err(MathError::invalid_input(
            "Matrix must be square for eigen-decomposition",
        ));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(
            "Matrix contains non-finite entries",
        ));
    }

    let eigen = SymmetricEigen::new(matrix.clone());

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = order
        .iter()
        .map(|&i| eigen.eigenvectors.column(i).iter().copied().collect())
        .collect();

    Ok(EigenPairs { values, vectors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lu_decomposition() {
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0]);

        let (l, u) = lu_decomposition(&a).unwrap();

        // Verify L * U = A
        let product = &l * &u;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(product[(i, j)], a[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_solve_linear_system() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![5.0, 5.0]);

        let x = solve_linear_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_singular_system() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);

        assert!(solve_linear_system(&a, &b).is_err());
    }

    #[test]
    fn test_covariance_matrix() {
        let data = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0, 4.0, 8.0]);

        let cov = covariance_matrix(&data).unwrap();

        // var(x) = 5/3, cov(x, 2x) = 10/3, var(2x) = 20/3
        assert_relative_eq!(cov[(0, 0)], 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cov[(0, 1)], 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cov[(1, 1)], 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_eigen_sorted() {
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 2.0]);

        let pairs = symmetric_eigen_sorted(&m).unwrap();

        assert_relative_eq!(pairs.values[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(pairs.values[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(pairs.values[2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(pairs.vectors[0][1].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigen_rejects_non_square() {
        let m = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert!(symmetric_eigen_sorted(&m).is_err());
    }
}
