//! Time-series diagnostics: autocorrelation, partial autocorrelation,
//! differencing, and moving averages.
//!
//! All routines operate over valid index ranges only (no wraparound) and
//! reject degenerate inputs (constant series for the ACF, differencing
//! orders at or beyond the series length, windows outside `[1, n]`).

use crate::errors::{validate_data_length, HydroResult, HydroStatsError};

/// Autocorrelation function for lags 0 through `max_lag`.
///
/// Lag-k coefficient is `sum (x_t - mean)(x_{t+k} - mean) / sum (x_t -
/// mean)^2`, both sums over the valid overlap. Lag 0 is 1.0 by
/// construction for any non-constant series.
pub fn autocorrelation(data: &[f64], max_lag: usize) -> HydroResult<Vec<f64>> {
    validate_data_length(data, max_lag + 1, "autocorrelation")?;

    let n = data.len();
    let mean = data.iter().sum::<f64>() / n as f64;
    let denominator: f64 = data.iter().map(|x| (x - mean) * (x - mean)).sum();
    if denominator <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: autocorrelation undefined for constant series".to_string(),
            operation: Some("autocorrelation".to_string()),
        });
    }

    let mut acf = Vec::with_capacity(max_lag + 1);
    acf.push(1.0);
    for lag in 1..=max_lag {
        let mut numerator = 0.0;
        for t in 0..(n - lag) {
            numerator += (data[t] - mean) * (data[t + lag] - mean);
        }
        acf.push(numerator / denominator);
    }
    Ok(acf)
}

/// Partial autocorrelation function via the Durbin-Levinson recursion.
///
/// Builds AR(k) coefficient vectors incrementally from the ACF up to the
/// target lag; O(k^2) total. Entry 0 is 1.0 by convention, entry k is the
/// lag-k partial autocorrelation.
pub fn partial_autocorrelation(data: &[f64], max_lag: usize) -> HydroResult<Vec<f64>> {
    let acf = autocorrelation(data, max_lag)?;

    let mut pacf = Vec::with_capacity(max_lag + 1);
    pacf.push(1.0);
    if max_lag == 0 {
        return Ok(pacf);
    }

    // phi[j] holds the AR(k) coefficients phi_{k,1..=k} of the current order
    let mut phi = vec![0.0; max_lag + 1];
    let mut prev = vec![0.0; max_lag + 1];
    phi[1] = acf[1];
    pacf.push(acf[1]);
    let mut variance = 1.0 - acf[1] * acf[1];

    for k in 2..=max_lag {
        if variance <= 0.0 {
            return Err(HydroStatsError::NumericalError {
                reason: format!("Durbin-Levinson innovation variance vanished at lag {}", k),
                operation: Some("partial_autocorrelation".to_string()),
            });
        }
        let mut numerator = acf[k];
        for j in 1..k {
            numerator -= phi[j] * acf[k - j];
        }
        let phi_kk = numerator / variance;

        prev[..k].copy_from_slice(&phi[..k]);
        for j in 1..k {
            phi[j] = prev[j] - phi_kk * prev[k - j];
        }
        phi[k] = phi_kk;
        variance *= 1.0 - phi_kk * phi_kk;
        pacf.push(phi_kk);
    }
    Ok(pacf)
}

/// Differencing of order `d`: `data[d..] - data[..n-d]`.
///
/// The result has `d` fewer elements; `d == 0` or `d >= n` is rejected.
pub fn difference(data: &[f64], order: usize) -> HydroResult<Vec<f64>> {
    if order == 0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "order".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    if order >= data.len() {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "order".to_string(),
            value: order as f64,
            constraint: format!("< series length ({})", data.len()),
        });
    }
    Ok((order..data.len())
        .map(|i| data[i] - data[i - order])
        .collect())
}

/// Cumulative sum of the series. Order-1 differencing of the result
/// recovers `data[1..]`.
pub fn cumulative_sum(data: &[f64]) -> HydroResult<Vec<f64>> {
    validate_data_length(data, 1, "cumulative_sum")?;
    let mut out = Vec::with_capacity(data.len());
    let mut acc = 0.0;
    for &value in data {
        acc += value;
        out.push(acc);
    }
    Ok(out)
}

fn validate_window(window: usize, n: usize) -> HydroResult<()> {
    if window == 0 || window > n {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "window".to_string(),
            value: window as f64,
            constraint: format!("[1, {}]", n),
        });
    }
    Ok(())
}

/// Simple moving average over a fixed window, each window recomputed.
///
/// Returns `n - window + 1` values.
pub fn simple_moving_average(data: &[f64], window: usize) -> HydroResult<Vec<f64>> {
    validate_data_length(data, 1, "simple_moving_average")?;
    validate_window(window, data.len())?;
    Ok(data
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect())
}

/// Moving average maintained as a running sum.
///
/// Numerically equivalent to [`simple_moving_average`] within floating
/// tolerance, at O(n) instead of O(n * window).
pub fn linear_moving_average(data: &[f64], window: usize) -> HydroResult<Vec<f64>> {
    validate_data_length(data, 1, "linear_moving_average")?;
    validate_window(window, data.len())?;

    let mut out = Vec::with_capacity(data.len() - window + 1);
    let mut running: f64 = data[..window].iter().sum();
    out.push(running / window as f64);
    for i in window..data.len() {
        running += data[i] - data[i - window];
        out.push(running / window as f64);
    }
    Ok(out)
}

/// Exponential moving average, `ema_t = alpha * x_t + (1 - alpha) *
/// ema_{t-1}`, seeded with the first observation.
pub fn exponential_moving_average(data: &[f64], alpha: f64) -> HydroResult<Vec<f64>> {
    validate_data_length(data, 1, "exponential_moving_average")?;
    if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "alpha".to_string(),
            value: alpha,
            constraint: "(0, 1]".to_string(),
        });
    }

    let mut out = Vec::with_capacity(data.len());
    let mut ema = data[0];
    out.push(ema);
    for &x in &data[1..] {
        ema = alpha * x + (1.0 - alpha) * ema;
        out.push(ema);
    }
    Ok(out)
}
