//! Descriptive statistics and data-cleaning utilities.
//!
//! Moment statistics, order statistics with interpolated quantiles, IQR and
//! z-score outlier fences, and gap handling over caller-supplied sentinel
//! values. Moment statistics use population denominators (divide by n),
//! matching the hydrological convention of the rest of the engine; empty
//! input is a reportable error, never a silent `NaN`.

use crate::errors::{
    validate_all_finite, validate_data_length, validate_equal_length, validate_parameter,
    HydroResult, HydroStatsError,
};

/// Strategy for filling gap values in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum FillMethod {
    /// Average of the nearest valid neighbors; single neighbor at boundaries.
    Interpolate,
    /// Mean of the non-gap values.
    Mean,
    /// Median of the non-gap values.
    Median,
}

/// Safe comparison for floating point values (pushes NaN to the end).
pub(crate) fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap(),
    }
}

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "mean")?;
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sum of the series.
pub fn sum(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "sum")?;
    Ok(data.iter().sum())
}

/// Minimum value, NaN-free input required.
pub fn min_value(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "min")?;
    validate_all_finite(data, "min")?;
    Ok(data.iter().cloned().fold(f64::INFINITY, f64::min))
}

/// Maximum value, NaN-free input required.
pub fn max_value(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "max")?;
    validate_all_finite(data, "max")?;
    Ok(data.iter().cloned().fold(f64::NEG_INFINITY, f64::max))
}

/// Range (max - min).
pub fn range(data: &[f64]) -> HydroResult<f64> {
    Ok(max_value(data)? - min_value(data)?)
}

/// Median via midpoint of the sorted series.
pub fn median(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "median")?;
    let mut sorted = data.to_vec();
    sorted.sort_by(float_total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        Ok(sorted[n / 2])
    } else {
        Ok(0.5 * (sorted[n / 2 - 1] + sorted[n / 2]))
    }
}

/// Population variance (divides by n).
pub fn variance(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "variance")?;
    let m = mean(data)?;
    Ok(data
        .iter()
        .map(|x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64)
}

/// Sample variance (divides by n - 1). Used by the test statistics that
/// require the unbiased estimator.
pub fn sample_variance(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 2, "sample variance")?;
    let m = mean(data)?;
    Ok(data
        .iter()
        .map(|x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / (data.len() - 1) as f64)
}

/// Population standard deviation, `sqrt(variance)`.
pub fn std_dev(data: &[f64]) -> HydroResult<f64> {
    Ok(variance(data)?.sqrt())
}

/// Moment-based skewness, `m3 / m2^(3/2)` with population moments.
///
/// Needs at least 3 points (any 2-point sample is symmetric); constant
/// series have undefined skewness and raise a numerical error.
pub fn skewness(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 3, "skewness")?;
    let m = mean(data)?;
    let n = data.len() as f64;
    let m2 = data.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: skewness undefined for constant series".to_string(),
            operation: Some("skewness".to_string()),
        });
    }
    let m3 = data.iter().map(|x| (x - m).powi(3)).sum::<f64>() / n;
    Ok(m3 / m2.powf(1.5))
}

/// Moment-based kurtosis, `m4 / m2^2` with population moments.
///
/// Pearson (non-excess) kurtosis: a normal sample is close to 3.
pub fn kurtosis(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 2, "kurtosis")?;
    let m = mean(data)?;
    let n = data.len() as f64;
    let m2 = data.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: kurtosis undefined for constant series".to_string(),
            operation: Some("kurtosis".to_string()),
        });
    }
    let m4 = data.iter().map(|x| (x - m).powi(4)).sum::<f64>() / n;
    Ok(m4 / (m2 * m2))
}

/// Geometric mean of strictly positive data.
pub fn geometric_mean(data: &[f64]) -> HydroResult<f64> {
    validate_data_length(data, 1, "geometric mean")?;
    for &x in data {
        if x <= 0.0 {
            return Err(HydroStatsError::InvalidParameter {
                parameter: "data".to_string(),
                value: x,
                constraint: "> 0 for geometric mean".to_string(),
            });
        }
    }
    let log_mean = data.iter().map(|x| x.ln()).sum::<f64>() / data.len() as f64;
    Ok(log_mean.exp())
}

/// Coefficient of variation, `stddev / mean`.
pub fn coefficient_of_variation(data: &[f64]) -> HydroResult<f64> {
    let m = mean(data)?;
    if m == 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero mean: coefficient of variation undefined".to_string(),
            operation: Some("coefficient_of_variation".to_string()),
        });
    }
    Ok(std_dev(data)? / m)
}

/// Population covariance of two equal-length series.
pub fn covariance(a: &[f64], b: &[f64]) -> HydroResult<f64> {
    validate_equal_length(a, b)?;
    validate_data_length(a, 1, "covariance")?;
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / a.len() as f64)
}

/// Pearson correlation coefficient of two equal-length series.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> HydroResult<f64> {
    validate_equal_length(a, b)?;
    validate_data_length(a, 2, "correlation")?;
    let cov = covariance(a, b)?;
    let sd_a = std_dev(a)?;
    let sd_b = std_dev(b)?;
    if sd_a <= 0.0 || sd_b <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: correlation undefined for constant series".to_string(),
            operation: Some("pearson_correlation".to_string()),
        });
    }
    Ok(cov / (sd_a * sd_b))
}

/// Quantile with linear interpolation between order statistics.
///
/// Computes the fractional rank `p = (n - 1) * q`; an integral rank
/// returns that order statistic, otherwise the floor and ceil neighbors
/// are interpolated. `quantile(data, 0.5)` equals `median(data)` for both
/// even and odd lengths.
pub fn quantile(data: &[f64], q: f64) -> HydroResult<f64> {
    validate_data_length(data, 1, "quantile")?;
    validate_parameter(q, 0.0, 1.0, "q")?;

    let mut sorted = data.to_vec();
    sorted.sort_by(float_total_cmp);

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        Ok(sorted[lower])
    } else {
        let weight = position - lower as f64;
        Ok(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
    }
}

/// IQR outlier fences `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` for configurable
/// quartile levels.
pub fn iqr_outlier_bounds(data: &[f64], q1: f64, q2: f64) -> HydroResult<(f64, f64)> {
    if q1 >= q2 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "q1".to_string(),
            value: q1,
            constraint: format!("< q2 ({})", q2),
        });
    }
    let lower_quartile = quantile(data, q1)?;
    let upper_quartile = quantile(data, q2)?;
    let iqr = upper_quartile - lower_quartile;
    Ok((lower_quartile - 1.5 * iqr, upper_quartile + 1.5 * iqr))
}

/// Filters the series to values inside the IQR fences.
///
/// Defaults in the calling convention are `q1 = 0.25`, `q2 = 0.75`.
pub fn iqr_outlier_filter(data: &[f64], q1: f64, q2: f64) -> HydroResult<Vec<f64>> {
    let (low, high) = iqr_outlier_bounds(data, q1, q2)?;
    Ok(data
        .iter()
        .filter(|&&x| x >= low && x <= high)
        .cloned()
        .collect())
}

/// Filters the series to values whose z-score lies in `[low, high]`.
///
/// The reference fences default to ±0.5, which is deliberately tight; the
/// bounds are caller-configurable.
pub fn zscore_outlier_filter(data: &[f64], low: f64, high: f64) -> HydroResult<Vec<f64>> {
    if low >= high {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "low".to_string(),
            value: low,
            constraint: format!("< high ({})", high),
        });
    }
    let m = mean(data)?;
    let sd = std_dev(data)?;
    if sd <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: z-scores undefined for constant series".to_string(),
            operation: Some("zscore_outlier_filter".to_string()),
        });
    }
    Ok(data
        .iter()
        .filter(|&&x| {
            let z = (x - m) / sd;
            z >= low && z <= high
        })
        .cloned()
        .collect())
}

/// True when a value matches one of the gap sentinels (NaN matched by kind).
fn is_gap(value: f64, sentinels: &[f64]) -> bool {
    sentinels
        .iter()
        .any(|&s| (s.is_nan() && value.is_nan()) || value == s)
}

/// Indices of gap values in the series.
pub fn find_gaps(data: &[f64], sentinels: &[f64]) -> Vec<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, &x)| is_gap(x, sentinels))
        .map(|(i, _)| i)
        .collect()
}

/// Removes gap values, returning the compacted series.
pub fn remove_gaps(data: &[f64], sentinels: &[f64]) -> Vec<f64> {
    data.iter()
        .filter(|&&x| !is_gap(x, sentinels))
        .cloned()
        .collect()
}

/// Fills gap values with the chosen strategy.
///
/// `Interpolate` averages the nearest valid neighbor on each side, and
/// falls back to the single available neighbor at the boundaries. `Mean`
/// and `Median` substitute the respective statistic of the non-gap values.
/// A series with no valid values cannot be filled and raises an error.
pub fn fill_gaps(data: &[f64], sentinels: &[f64], method: FillMethod) -> HydroResult<Vec<f64>> {
    validate_data_length(data, 1, "fill_gaps")?;
    let valid = remove_gaps(data, sentinels);
    if valid.is_empty() {
        return Err(HydroStatsError::NumericalError {
            reason: "All values are gaps: nothing to fill from".to_string(),
            operation: Some("fill_gaps".to_string()),
        });
    }

    let fill_constant = match method {
        FillMethod::Mean => Some(mean(&valid)?),
        FillMethod::Median => Some(median(&valid)?),
        FillMethod::Interpolate => None,
    };

    let mut filled = data.to_vec();
    for i in 0..filled.len() {
        if !is_gap(data[i], sentinels) {
            continue;
        }
        if let Some(value) = fill_constant {
            filled[i] = value;
            continue;
        }

        // Nearest valid neighbor on each side of the gap
        let before = data[..i]
            .iter()
            .rev()
            .find(|&&x| !is_gap(x, sentinels))
            .cloned();
        let after = data[i + 1..]
            .iter()
            .find(|&&x| !is_gap(x, sentinels))
            .cloned();
        filled[i] = match (before, after) {
            (Some(b), Some(a)) => 0.5 * (b + a),
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => unreachable!("valid is non-empty"),
        };
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_mean_concrete_case() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap(), 3.0);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_stddev_concrete_case() {
        // Population standard deviation of the classic textbook series
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx_eq!(std_dev(&data).unwrap(), 2.0, 1e-12);
        assert_approx_eq!(variance(&data).unwrap(), 4.0, 1e-12);
    }

    #[test]
    fn test_variance_nonnegative_and_sqrt_relation() {
        let data = vec![1.3, -0.2, 4.5, 2.2, 0.0];
        let var = variance(&data).unwrap();
        assert!(var >= 0.0);
        assert_approx_eq!(std_dev(&data).unwrap(), var.sqrt(), 1e-12);
    }

    #[test]
    fn test_quantile_matches_median() {
        let odd = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        let even = vec![4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&odd, 0.5).unwrap(), median(&odd).unwrap());
        assert_eq!(quantile(&even, 0.5).unwrap(), median(&even).unwrap());
    }

    #[test]
    fn test_quantile_interpolation() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        // p = 3 * 0.25 = 0.75 -> between 1.0 and 2.0
        assert_approx_eq!(quantile(&data, 0.25).unwrap(), 1.75, 1e-12);
        assert_eq!(quantile(&data, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&data, 1.0).unwrap(), 4.0);
        assert!(quantile(&data, 1.5).is_err());
    }

    #[test]
    fn test_skewness_symmetry() {
        let symmetric = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_approx_eq!(skewness(&symmetric).unwrap(), 0.0, 1e-12);
        let right_tailed = vec![1.0, 1.0, 1.0, 2.0, 10.0];
        assert!(skewness(&right_tailed).unwrap() > 0.0);
        assert!(skewness(&[3.0, 3.0, 3.0]).is_err());
        // Two points are always symmetric; below the minimum length
        assert!(matches!(
            skewness(&[1.0, 2.0]),
            Err(HydroStatsError::InsufficientData { required: 3, .. })
        ));
    }

    #[test]
    fn test_kurtosis_of_constant_errors() {
        assert!(kurtosis(&[1.0, 1.0, 1.0]).is_err());
        // Two-point symmetric distribution has minimal kurtosis 1
        assert_approx_eq!(kurtosis(&[-1.0, 1.0, -1.0, 1.0]).unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn test_geometric_mean() {
        assert_approx_eq!(geometric_mean(&[2.0, 8.0]).unwrap(), 4.0, 1e-12);
        assert!(geometric_mean(&[2.0, -1.0]).is_err());
    }

    #[test]
    fn test_correlation_perfect_and_mismatch() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        assert_approx_eq!(pearson_correlation(&x, &y).unwrap(), 1.0, 1e-12);
        let y_neg: Vec<f64> = y.iter().map(|v| -v).collect();
        assert_approx_eq!(pearson_correlation(&x, &y_neg).unwrap(), -1.0, 1e-12);
        assert!(pearson_correlation(&x, &y[..3]).is_err());
    }

    #[test]
    fn test_iqr_outlier_filter() {
        let data = vec![1.0, 2.0, 2.5, 3.0, 3.5, 4.0, 100.0];
        let filtered = iqr_outlier_filter(&data, 0.25, 0.75).unwrap();
        assert!(!filtered.contains(&100.0));
        assert!(filtered.contains(&1.0));
        assert!(iqr_outlier_filter(&data, 0.75, 0.25).is_err());
    }

    #[test]
    fn test_zscore_outlier_filter_keeps_center() {
        let data = vec![10.0, 10.1, 9.9, 10.0, 50.0];
        let filtered = zscore_outlier_filter(&data, -0.5, 0.5).unwrap();
        assert!(!filtered.contains(&50.0));
        assert!(zscore_outlier_filter(&[5.0, 5.0], -0.5, 0.5).is_err());
    }

    #[test]
    fn test_gap_detection_with_nan_and_sentinel() {
        let data = vec![1.0, f64::NAN, 3.0, -9999.0, 5.0];
        let sentinels = vec![f64::NAN, -9999.0];
        assert_eq!(find_gaps(&data, &sentinels), vec![1, 3]);
        assert_eq!(remove_gaps(&data, &sentinels), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_fill_gaps_interpolate() {
        let sentinels = vec![f64::NAN];
        let data = vec![1.0, f64::NAN, 3.0];
        let filled = fill_gaps(&data, &sentinels, FillMethod::Interpolate).unwrap();
        assert_eq!(filled, vec![1.0, 2.0, 3.0]);

        // Boundary gap takes its single neighbor
        let data = vec![f64::NAN, 4.0, 6.0];
        let filled = fill_gaps(&data, &sentinels, FillMethod::Interpolate).unwrap();
        assert_eq!(filled, vec![4.0, 4.0, 6.0]);
    }

    #[test]
    fn test_fill_gaps_mean_and_median() {
        let sentinels = vec![-9999.0];
        let data = vec![1.0, -9999.0, 2.0, 6.0];
        let filled_mean = fill_gaps(&data, &sentinels, FillMethod::Mean).unwrap();
        assert_approx_eq!(filled_mean[1], 3.0, 1e-12);
        let filled_median = fill_gaps(&data, &sentinels, FillMethod::Median).unwrap();
        assert_approx_eq!(filled_median[1], 2.0, 1e-12);
    }

    #[test]
    fn test_fill_gaps_all_gaps_errors() {
        let sentinels = vec![f64::NAN];
        assert!(fill_gaps(&[f64::NAN, f64::NAN], &sentinels, FillMethod::Mean).is_err());
    }
}
