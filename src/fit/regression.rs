//! Linear regression of log-earnings on encoded record features.
//!
//! Given records we:
//! - encode them (`features::encode`)
//! - z-score each column (`math::zscore_columns`)
//! - prepend a column of ones (intercept)
//! - solve OLS against `y = ln(1 + earnings)`
//!
//! Columns that were constant across the batch are all zeros after scaling. They
//! are left out of the solve and get a coefficient of exactly 0, otherwise every
//! batch with an unused attribute would look singular.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::Record;
use crate::error::AnalysisError;
use crate::features::encode;
use crate::math::{solve_least_squares, zscore_columns};

/// Fitted coefficients aligned with feature names.
#[derive(Debug, Clone)]
pub struct RegressionFit {
    pub feature_names: Vec<String>,
    /// Length `D + 1`; index 0 is the intercept.
    pub beta: DVector<f64>,
    /// Features that were constant and therefore pinned to 0.
    pub constant_features: Vec<String>,
}

impl RegressionFit {
    pub fn intercept(&self) -> f64 {
        self.beta[0]
    }

    /// Per-feature coefficients (intercept excluded), aligned with `feature_names`.
    pub fn coefficients(&self) -> &[f64] {
        &self.beta.as_slice()[1..]
    }
}

/// `ln(1 + earnings)` for each record.
pub fn log_earnings(records: &[Record]) -> DVector<f64> {
    DVector::from_iterator(records.len(), records.iter().map(|r| r.earnings.ln_1p()))
}

/// Fit the log-earnings regression over the full record set.
pub fn fit_log_earnings(records: &[Record]) -> Result<RegressionFit, AnalysisError> {
    let design = encode(records)?;
    let normalized = zscore_columns(&design.matrix);

    let n = design.rows();
    let d = design.cols();
    let active: Vec<usize> = (0..d).filter(|&c| !normalized.is_constant(c)).collect();

    debug!(
        records = n,
        features = d,
        active = active.len(),
        "fitting log-earnings regression"
    );

    let mut xb = DMatrix::<f64>::from_element(n, active.len() + 1, 1.0);
    for (j, &c) in active.iter().enumerate() {
        xb.set_column(j + 1, &normalized.matrix.column(c));
    }

    let y = log_earnings(records);
    let solved = solve_least_squares(&xb, &y)?;

    let mut beta = DVector::<f64>::zeros(d + 1);
    beta[0] = solved[0];
    for (j, &c) in active.iter().enumerate() {
        beta[c + 1] = solved[j + 1];
    }

    let constant_features = (0..d)
        .filter(|&c| normalized.is_constant(c))
        .map(|c| design.feature_names[c].clone())
        .collect();

    Ok(RegressionFit {
        feature_names: design.feature_names,
        beta,
        constant_features,
    })
}
