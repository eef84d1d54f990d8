//! Error types and validation functions for hydrological statistics.
//!
//! This module provides the error taxonomy used across the engine: data
//! errors (wrong length, empty input), domain errors (parameters outside
//! their valid range), and numerical errors (non-convergence, singular
//! matrices). Invalid input raises immediately instead of propagating
//! `NaN` or `Infinity` through downstream computations.

use thiserror::Error;

/// Error types for hydrological statistics operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum HydroStatsError {
    /// Insufficient data for the requested computation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Paired-series length mismatch.
    #[error("Length mismatch: expected {expected} points, got {actual}")]
    LengthMismatch {
        /// Length of the first series
        expected: usize,
        /// Length of the offending series
        actual: usize,
    },

    /// Wrong dimensionality (ragged matrix, non-square matrix, empty group set).
    #[error("Dimension error: {reason}")]
    DimensionError {
        /// Description of the dimensional problem
        reason: String,
    },

    /// Parameter outside its valid range.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Numerical computation failure (non-finite intermediate, degenerate input).
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Gauss-Jordan elimination hit a numerically zero pivot.
    #[error("Singular matrix: zero pivot at row {pivot}")]
    SingularMatrix {
        /// Row index of the degenerate pivot
        pivot: usize,
    },

    /// Iterative approximation did not converge within its iteration budget.
    #[error("Non-convergence in {operation} after {iterations} iterations")]
    NonConvergence {
        /// Name of the iterative routine
        operation: String,
        /// Iteration budget that was exhausted
        iterations: usize,
    },
}

/// Result type for hydrological statistics operations.
pub type HydroResult<T> = Result<T, HydroStatsError>;

/// Validates that data has sufficient length for a computation.
///
/// # Arguments
/// * `data` - Input series
/// * `min_required` - Minimum number of data points required
/// * `operation` - Name of the operation requiring the data
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    _operation: &str,
) -> HydroResult<()> {
    if data.len() < min_required {
        return Err(HydroStatsError::InsufficientData {
            required: min_required,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Validates that two paired series have equal length.
///
/// Paired operations (correlation, paired tests, efficiency metrics) are
/// undefined for unequal lengths; this is a reportable error, never
/// silent truncation.
pub fn validate_equal_length(a: &[f64], b: &[f64]) -> HydroResult<()> {
    if a.len() != b.len() {
        return Err(HydroStatsError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Validates that a parameter is within expected bounds (inclusive).
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> HydroResult<()> {
    if value.is_nan() {
        return Err(HydroStatsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }
    if value < min || value > max {
        return Err(HydroStatsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        });
    }
    Ok(())
}

/// Validates that all values in a series are finite.
pub fn validate_all_finite(data: &[f64], operation: &str) -> HydroResult<()> {
    for (i, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(HydroStatsError::NumericalError {
                reason: format!("Non-finite value ({}) at index {}", value, i),
                operation: Some(operation.to_string()),
            });
        }
    }
    Ok(())
}

/// Validates a probability, strictly inside (0, 1).
pub fn validate_probability_open(value: f64, name: &str) -> HydroResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "(0, 1)".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data_length() {
        let data = vec![1.0, 2.0, 3.0];
        assert!(validate_data_length(&data, 2, "test").is_ok());
        assert!(matches!(
            validate_data_length(&data, 5, "test"),
            Err(HydroStatsError::InsufficientData {
                required: 5,
                actual: 3
            })
        ));
        assert!(matches!(
            validate_data_length(&[], 1, "test"),
            Err(HydroStatsError::InsufficientData { actual: 0, .. })
        ));
    }

    #[test]
    fn test_validate_equal_length() {
        assert!(validate_equal_length(&[1.0, 2.0], &[3.0, 4.0]).is_ok());
        assert!(matches!(
            validate_equal_length(&[1.0, 2.0], &[3.0]),
            Err(HydroStatsError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_validate_parameter_bounds() {
        assert!(validate_parameter(0.5, 0.0, 1.0, "alpha").is_ok());
        assert!(validate_parameter(1.5, 0.0, 1.0, "alpha").is_err());
        assert!(validate_parameter(f64::NAN, 0.0, 1.0, "alpha").is_err());
    }

    #[test]
    fn test_validate_probability_open_rejects_endpoints() {
        assert!(validate_probability_open(0.5, "p").is_ok());
        assert!(validate_probability_open(0.0, "p").is_err());
        assert!(validate_probability_open(1.0, "p").is_err());
        assert!(validate_probability_open(f64::INFINITY, "p").is_err());
    }

    #[test]
    fn test_validate_all_finite() {
        assert!(validate_all_finite(&[1.0, 2.0], "test").is_ok());
        assert!(validate_all_finite(&[1.0, f64::NAN], "test").is_err());
        assert!(validate_all_finite(&[f64::INFINITY], "test").is_err());
    }
}
