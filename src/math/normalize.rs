//! Column-wise z-score normalization.
//!
//! Each column is centered on its mean and divided by its sample standard
//! deviation (n − 1 denominator). A column whose values are all equal is
//! divided by 1 instead, so it comes out as all zeros and carries no signal
//! into the fit. Equality is checked on the raw values: a constant like 0.1
//! has a mean that is not exactly 0.1, which leaves a tiny nonzero std.

use nalgebra::DMatrix;

/// Normalized matrix plus the per-column statistics used to produce it.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub matrix: DMatrix<f64>,
    /// Raw standard deviations (before the zero guard).
    pub std_devs: Vec<f64>,
    constant: Vec<bool>,
}

impl Normalized {
    /// Whether every value in column `c` was identical in the input.
    pub fn is_constant(&self, c: usize) -> bool {
        self.constant[c]
    }
}

/// Z-score normalize every column of `x` independently.
pub fn zscore_columns(x: &DMatrix<f64>) -> Normalized {
    let (n, d) = x.shape();
    let mut out = x.clone();
    let mut std_devs = Vec::with_capacity(d);
    let mut constant = Vec::with_capacity(d);

    for c in 0..d {
        let col = x.column(c);
        let mean = if n == 0 { 0.0 } else { col.sum() / n as f64 };
        let std = if n < 2 {
            0.0
        } else {
            let ss: f64 = col.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n as f64 - 1.0)).sqrt()
        };
        let flat = col.iter().all(|v| *v == col[0]);

        if flat {
            out.column_mut(c).fill(0.0);
        } else {
            let divisor = if std > 0.0 { std } else { 1.0 };
            for v in out.column_mut(c).iter_mut() {
                *v = (*v - mean) / divisor;
            }
        }
        std_devs.push(std);
        constant.push(flat);
    }

    Normalized {
        matrix: out,
        std_devs,
        constant,
    }
}
