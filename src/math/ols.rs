//! Ordinary least squares solver.
//!
//! We solve
//!
//! ```text
//! minimize ‖X β − y‖²
//! ```
//!
//! with an SVD of `X`. Nalgebra's `QR::solve` is meant for square systems, while
//! the SVD handles tall matrices and exposes the singular values, which we use to
//! refuse rank-deficient systems instead of returning an arbitrary minimum-norm
//! answer.

use nalgebra::{DMatrix, DVector};

use crate::error::SolverError;

/// Relative cutoff for treating a singular value as zero.
///
/// Inputs are z-scored, so columns are on comparable scales and a fixed relative
/// cutoff works across datasets.
const RANK_RCOND: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Errors when inputs are non-finite, when there are fewer rows than columns, or
/// when the columns are numerically collinear.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, SolverError> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(SolverError::ShapeMismatch { rows: n, target_len: y.len() });
    }
    if !x.iter().all(|v| v.is_finite()) {
        return Err(SolverError::NonFinite { what: "design matrix" });
    }
    if !y.iter().all(|v| v.is_finite()) {
        return Err(SolverError::NonFinite { what: "target vector" });
    }
    if n < p || p == 0 {
        return Err(SolverError::Underdetermined { rows: n, cols: p });
    }

    let svd = x.clone().svd(true, true);

    // Singular values below this fraction of σ_max count as zero.
    let tol = svd.singular_values.max() * RANK_RCOND;
    let rank = svd.rank(tol);
    if rank < p {
        return Err(SolverError::Singular { rank, cols: p });
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| SolverError::Diverged { reason: e.to_string() })?;

    if !beta.iter().all(|v| v.is_finite()) {
        return Err(SolverError::Diverged {
            reason: "non-finite coefficients".to_string(),
        });
    }

    Ok(beta)
}
