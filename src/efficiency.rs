//! Model-efficiency metrics for paired observed/modeled series.
//!
//! Goodness-of-fit measures common in hydrological model evaluation:
//! Nash-Sutcliffe Efficiency, coefficient of determination, Index of
//! Agreement, and the RMSE/MAE/MAPE error family. All metrics require
//! equal-length, non-empty inputs.

use crate::descriptive::{mean, pearson_correlation};
use crate::errors::{
    validate_data_length, validate_equal_length, HydroResult, HydroStatsError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selector for [`model_efficiency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum EfficiencyMetric {
    /// Nash-Sutcliffe Efficiency.
    Nse,
    /// Coefficient of determination (squared Pearson correlation).
    RSquared,
    /// Willmott's Index of Agreement.
    IndexOfAgreement,
    /// Root mean square error.
    Rmse,
    /// Mean absolute error.
    Mae,
    /// Mean absolute percentage error.
    Mape,
}

fn validate_pair(observed: &[f64], modeled: &[f64]) -> HydroResult<()> {
    validate_equal_length(observed, modeled)?;
    validate_data_length(observed, 1, "efficiency metric")
}

/// Nash-Sutcliffe Efficiency: `1 - sum (model - obs)^2 / sum (obs - mean(obs))^2`.
///
/// Exactly 1.0 for a perfect fit and exactly 0.0 for the mean predictor.
pub fn nse(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    validate_pair(observed, modeled)?;
    let obs_mean = mean(observed)?;
    let denominator: f64 = observed
        .iter()
        .map(|o| (o - obs_mean) * (o - obs_mean))
        .sum();
    if denominator <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance in observations: NSE undefined".to_string(),
            operation: Some("nse".to_string()),
        });
    }
    let numerator: f64 = observed
        .iter()
        .zip(modeled.iter())
        .map(|(o, m)| (m - o) * (m - o))
        .sum();
    Ok(1.0 - numerator / denominator)
}

/// Coefficient of determination via the squared Pearson correlation of
/// model against observed.
pub fn r_squared(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    let r = pearson_correlation(observed, modeled)?;
    Ok(r * r)
}

/// Willmott's Index of Agreement.
///
/// `1 - sum (obs - model)^2 / sum (|model - mean(obs)| + |obs - mean(obs)|)^2`.
pub fn index_of_agreement(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    validate_pair(observed, modeled)?;
    let obs_mean = mean(observed)?;
    let denominator: f64 = observed
        .iter()
        .zip(modeled.iter())
        .map(|(o, m)| {
            let spread = (m - obs_mean).abs() + (o - obs_mean).abs();
            spread * spread
        })
        .sum();
    if denominator <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero potential error: Index of Agreement undefined".to_string(),
            operation: Some("index_of_agreement".to_string()),
        });
    }
    let numerator: f64 = observed
        .iter()
        .zip(modeled.iter())
        .map(|(o, m)| (o - m) * (o - m))
        .sum();
    Ok(1.0 - numerator / denominator)
}

/// Root mean square error.
pub fn rmse(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    validate_pair(observed, modeled)?;
    let mse = observed
        .iter()
        .zip(modeled.iter())
        .map(|(o, m)| (o - m) * (o - m))
        .sum::<f64>()
        / observed.len() as f64;
    Ok(mse.sqrt())
}

/// Mean absolute error.
pub fn mae(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    validate_pair(observed, modeled)?;
    Ok(observed
        .iter()
        .zip(modeled.iter())
        .map(|(o, m)| (o - m).abs())
        .sum::<f64>()
        / observed.len() as f64)
}

/// Mean absolute percentage error, in percent. Zero observations make the
/// ratio undefined and raise an error.
pub fn mape(observed: &[f64], modeled: &[f64]) -> HydroResult<f64> {
    validate_pair(observed, modeled)?;
    let mut total = 0.0;
    for (o, m) in observed.iter().zip(modeled.iter()) {
        if *o == 0.0 {
            return Err(HydroStatsError::NumericalError {
                reason: "Zero observation: MAPE undefined".to_string(),
                operation: Some("mape".to_string()),
            });
        }
        total += ((o - m) / o).abs();
    }
    Ok(100.0 * total / observed.len() as f64)
}

/// Dispatch a metric by its selector.
pub fn model_efficiency(
    observed: &[f64],
    modeled: &[f64],
    metric: EfficiencyMetric,
) -> HydroResult<f64> {
    match metric {
        EfficiencyMetric::Nse => nse(observed, modeled),
        EfficiencyMetric::RSquared => r_squared(observed, modeled),
        EfficiencyMetric::IndexOfAgreement => index_of_agreement(observed, modeled),
        EfficiencyMetric::Rmse => rmse(observed, modeled),
        EfficiencyMetric::Mae => mae(observed, modeled),
        EfficiencyMetric::Mape => mape(observed, modeled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_nse_perfect_and_mean_predictor() {
        let obs = vec![1.0, 2.0, 3.0];
        assert_eq!(nse(&obs, &obs).unwrap(), 1.0);
        let mean_predictor = vec![2.0, 2.0, 2.0];
        assert_eq!(nse(&obs, &mean_predictor).unwrap(), 0.0);
        assert!(nse(&[2.0, 2.0], &[1.0, 3.0]).is_err());
    }

    #[test]
    fn test_nse_worse_than_mean_is_negative() {
        let obs = vec![1.0, 2.0, 3.0];
        let bad = vec![3.0, 0.0, 6.0];
        assert!(nse(&obs, &bad).unwrap() < 0.0);
    }

    #[test]
    fn test_r_squared_linear_relation() {
        let obs = vec![1.0, 2.0, 3.0, 4.0];
        let scaled: Vec<f64> = obs.iter().map(|v| 3.0 * v + 1.0).collect();
        assert_approx_eq!(r_squared(&obs, &scaled).unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn test_index_of_agreement_perfect_fit() {
        let obs = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(index_of_agreement(&obs, &obs).unwrap(), 1.0);
        let offset: Vec<f64> = obs.iter().map(|v| v + 1.0).collect();
        let d = index_of_agreement(&obs, &offset).unwrap();
        assert!(d > 0.0 && d < 1.0);
    }

    #[test]
    fn test_error_metrics_known_values() {
        let obs = vec![2.0, 4.0, 6.0];
        let model = vec![1.0, 4.0, 8.0];
        // Errors are -1, 0, +2
        assert_approx_eq!(rmse(&obs, &model).unwrap(), (5.0_f64 / 3.0).sqrt(), 1e-12);
        assert_approx_eq!(mae(&obs, &model).unwrap(), 1.0, 1e-12);
        assert_approx_eq!(
            mape(&obs, &model).unwrap(),
            100.0 * (0.5 + 0.0 + 2.0 / 6.0) / 3.0,
            1e-12
        );
        assert!(mape(&[0.0, 1.0], &[1.0, 1.0]).is_err());
    }

    #[test]
    fn test_dispatcher_matches_direct_calls() {
        let obs = vec![1.0, 3.0, 2.0, 5.0];
        let model = vec![1.2, 2.8, 2.4, 4.6];
        assert_eq!(
            model_efficiency(&obs, &model, EfficiencyMetric::Nse).unwrap(),
            nse(&obs, &model).unwrap()
        );
        assert_eq!(
            model_efficiency(&obs, &model, EfficiencyMetric::Rmse).unwrap(),
            rmse(&obs, &model).unwrap()
        );
        assert!(model_efficiency(&obs, &model[..3], EfficiencyMetric::Mae).is_err());
    }
}
