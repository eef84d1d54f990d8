//! Linear algebra and regression engine.
//!
//! Row-major `Vec<Vec<f64>>` matrices created transiently inside regression
//! calls: transpose, multiply, Gauss-Jordan inversion, ordinary least
//! squares via the normal equations, and per-column multivariate
//! regression. A numerically zero pivot during elimination raises
//! [`HydroStatsError::SingularMatrix`] instead of propagating
//! divide-by-zero artifacts.

use crate::errors::{validate_equal_length, HydroResult, HydroStatsError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative pivot threshold below which a matrix is treated as singular.
const SINGULARITY_TOL: f64 = 1e-12;

/// Fitted ordinary-least-squares model.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OlsFit {
    /// Coefficients, intercept first, then one per predictor column.
    pub coefficients: Vec<f64>,
    /// Fitted values `X beta`.
    pub fitted: Vec<f64>,
    /// Residuals `y - X beta`.
    pub residuals: Vec<f64>,
}

/// Validates that a matrix is rectangular and non-empty, returning (rows, cols).
pub(crate) fn ensure_rectangular(a: &[Vec<f64>]) -> HydroResult<(usize, usize)> {
    if a.is_empty() {
        return Err(HydroStatsError::DimensionError {
            reason: "Empty matrix provided".to_string(),
        });
    }
    let cols = a[0].len();
    if cols == 0 {
        return Err(HydroStatsError::DimensionError {
            reason: "Zero-width matrix (no columns)".to_string(),
        });
    }
    if !a.iter().all(|row| row.len() == cols) {
        return Err(HydroStatsError::DimensionError {
            reason: "Ragged matrix (inconsistent row lengths)".to_string(),
        });
    }
    Ok((a.len(), cols))
}

/// Validates that a matrix contains no NaN or Inf values.
pub(crate) fn ensure_finite(a: &[Vec<f64>], operation: &str) -> HydroResult<()> {
    for (i, row) in a.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(HydroStatsError::NumericalError {
                    reason: format!("Non-finite value ({}) at position [{},{}]", value, i, j),
                    operation: Some(operation.to_string()),
                });
            }
        }
    }
    Ok(())
}

/// Matrix transpose.
pub fn transpose(a: &[Vec<f64>]) -> HydroResult<Vec<Vec<f64>>> {
    let (rows, cols) = ensure_rectangular(a)?;
    let mut out = vec![vec![0.0; rows]; cols];
    for (i, row) in a.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            out[j][i] = value;
        }
    }
    Ok(out)
}

/// Matrix product `A * B`.
pub fn multiply(a: &[Vec<f64>], b: &[Vec<f64>]) -> HydroResult<Vec<Vec<f64>>> {
    let (a_rows, a_cols) = ensure_rectangular(a)?;
    let (b_rows, b_cols) = ensure_rectangular(b)?;
    if a_cols != b_rows {
        return Err(HydroStatsError::DimensionError {
            reason: format!(
                "Cannot multiply {}x{} by {}x{}",
                a_rows, a_cols, b_rows, b_cols
            ),
        });
    }
    let mut out = vec![vec![0.0; b_cols]; a_rows];
    for i in 0..a_rows {
        for k in 0..a_cols {
            let aik = a[i][k];
            if aik == 0.0 {
                continue;
            }
            for j in 0..b_cols {
                out[i][j] += aik * b[k][j];
            }
        }
    }
    Ok(out)
}

/// Matrix inverse via Gauss-Jordan elimination with partial pivoting.
///
/// Each pivot row is normalized before eliminating the remaining rows. A
/// pivot whose magnitude falls below a scale-relative tolerance raises
/// [`HydroStatsError::SingularMatrix`].
pub fn invert(a: &[Vec<f64>]) -> HydroResult<Vec<Vec<f64>>> {
    let (rows, cols) = ensure_rectangular(a)?;
    if rows != cols {
        return Err(HydroStatsError::DimensionError {
            reason: format!("Cannot invert non-square {}x{} matrix", rows, cols),
        });
    }
    ensure_finite(a, "invert")?;
    let n = rows;

    // Scale reference for the singularity threshold
    let max_abs = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, &v| acc.max(v.abs()))
        .max(1.0);

    // Augmented [A | I], reduced in place
    let mut work = vec![vec![0.0; 2 * n]; n];
    for i in 0..n {
        work[i][..n].copy_from_slice(&a[i]);
        work[i][n + i] = 1.0;
    }

    for col in 0..n {
        // Partial pivoting: swap in the largest remaining pivot candidate
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if work[row][col].abs() > work[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if pivot_row != col {
            work.swap(pivot_row, col);
        }

        let pivot = work[col][col];
        if pivot.abs() < SINGULARITY_TOL * max_abs {
            return Err(HydroStatsError::SingularMatrix { pivot: col });
        }

        // Normalize the pivot row
        for j in 0..2 * n {
            work[col][j] /= pivot;
        }

        // Eliminate the pivot column from every other row
        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = work[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..2 * n {
                work[row][j] -= factor * work[col][j];
            }
        }
    }

    Ok(work.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Ordinary least squares via the normal equations.
///
/// `x_columns` holds one predictor per entry, each of the same length as
/// `y`. An intercept column of ones is prepended and
/// `beta = (X^T X)^{-1} X^T y` is solved through the matrix engine. A
/// collinear design surfaces as [`HydroStatsError::SingularMatrix`].
pub fn ols_fit(x_columns: &[Vec<f64>], y: &[f64]) -> HydroResult<OlsFit> {
    let n = y.len();
    let k = x_columns.len();
    if n < k + 2 {
        return Err(HydroStatsError::InsufficientData {
            required: k + 2,
            actual: n,
        });
    }
    for column in x_columns {
        validate_equal_length(y, column)?;
    }

    // Design matrix with intercept column of ones
    let mut design = vec![vec![0.0; k + 1]; n];
    for i in 0..n {
        design[i][0] = 1.0;
        for (j, column) in x_columns.iter().enumerate() {
            design[i][j + 1] = column[i];
        }
    }
    ensure_finite(&design, "ols_fit")?;

    let design_t = transpose(&design)?;
    let xtx = multiply(&design_t, &design)?;
    let xtx_inv = invert(&xtx)?;

    // X^T y
    let xty: Vec<f64> = design_t
        .iter()
        .map(|row| row.iter().zip(y.iter()).map(|(a, b)| a * b).sum())
        .collect();

    let coefficients: Vec<f64> = xtx_inv
        .iter()
        .map(|row| row.iter().zip(xty.iter()).map(|(a, b)| a * b).sum())
        .collect();

    let fitted: Vec<f64> = design
        .iter()
        .map(|row| {
            row.iter()
                .zip(coefficients.iter())
                .map(|(a, b)| a * b)
                .sum()
        })
        .collect();
    let residuals: Vec<f64> = y.iter().zip(fitted.iter()).map(|(a, b)| a - b).collect();

    Ok(OlsFit {
        coefficients,
        fitted,
        residuals,
    })
}

/// Multivariate regression: one independent OLS fit per target column.
pub fn multivariate_regression(
    x_columns: &[Vec<f64>],
    y_columns: &[Vec<f64>],
) -> HydroResult<Vec<OlsFit>> {
    if y_columns.is_empty() {
        return Err(HydroStatsError::DimensionError {
            reason: "No target columns provided".to_string(),
        });
    }
    y_columns
        .iter()
        .map(|y| ols_fit(x_columns, y))
        .collect()
}

/// Least-squares line fit, returning `(slope, intercept, residuals)`.
///
/// Closed-form fast path used by the heteroscedasticity tests and
/// diagnostics; avoids building the full normal-equation system.
pub fn simple_linear_regression(x: &[f64], y: &[f64]) -> HydroResult<(f64, f64, Vec<f64>)> {
    validate_equal_length(x, y)?;
    let n = x.len();
    if n < 3 {
        return Err(HydroStatsError::InsufficientData {
            required: 3,
            actual: n,
        });
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        sxx += dx * dx;
        sxy += dx * (y[i] - mean_y);
    }
    if sxx <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Constant predictor: slope undefined".to_string(),
            operation: Some("simple_linear_regression".to_string()),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let residuals = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| yi - (intercept + slope * xi))
        .collect();
    Ok((slope, intercept, residuals))
}
