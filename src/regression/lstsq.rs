//! Least-squares fitting over explicit design-matrix rows.
//!
//! Solves the normal equations with a Cholesky decomposition. Ordinary least
//! squares carries a tiny diagonal regularization for numerical stability;
//! the ridge variant adds the configured penalty to every non-intercept
//! diagonal entry instead.

use crate::error::{BreakError, Result};
use crate::regression::RegressionKind;

/// Fit `y = X beta` and return the coefficient vector.
///
/// `x_rows` holds one design-matrix row per observation; the first column is
/// expected to be the intercept. Requires at least as many observations as
/// design terms.
pub fn fit(kind: &RegressionKind, x_rows: &[Vec<f64>], y: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    if x_rows.len() != n {
        return Err(BreakError::DimensionMismatch {
            expected: n,
            got: x_rows.len(),
        });
    }
    let p = x_rows.first().map(|r| r.len()).unwrap_or(0);
    if p == 0 || n < p {
        return Err(BreakError::InsufficientObservations { needed: p.max(1), got: n });
    }
    for row in x_rows {
        if row.len() != p {
            return Err(BreakError::DimensionMismatch {
                expected: p,
                got: row.len(),
            });
        }
    }

    // Accumulate X'X and X'y.
    let mut xtx = vec![vec![0.0; p]; p];
    let mut xty = vec![0.0; p];
    for (row, &y_obs) in x_rows.iter().zip(y.iter()) {
        for i in 0..p {
            xty[i] += row[i] * y_obs;
            for j in i..p {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        for j in 0..i {
            xtx[i][j] = xtx[j][i];
        }
    }

    match kind {
        RegressionKind::Ols => {
            for i in 0..p {
                xtx[i][i] += 1e-8;
            }
        }
        RegressionKind::Ridge { lambda } => {
            // The intercept column is not penalized.
            xtx[0][0] += 1e-8;
            for i in 1..p {
                xtx[i][i] += lambda;
            }
        }
    }

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        BreakError::PixelFit("design matrix not positive definite".to_string())
    })
}

/// Prediction for one design-matrix row.
pub fn predict(coefficients: &[f64], x_row: &[f64]) -> f64 {
    coefficients
        .iter()
        .zip(x_row.iter())
        .map(|(c, x)| c * x)
        .sum()
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
