//! Bootstrap resampling and simulation drivers.
//!
//! Bootstrap with bias, standard error, and percentile confidence
//! intervals; generic Monte Carlo and Markov-chain Monte Carlo drivers; and
//! a Box-Muller random-walk generator. Statistic selection for the
//! bootstrap is a closed enum rather than a name lookup, so an invalid
//! statistic cannot be expressed.

use crate::descriptive::{mean, median, std_dev, variance};
use crate::errors::{
    validate_all_finite, validate_data_length, validate_probability_open, HydroResult,
    HydroStatsError,
};
use crate::rng::{mix_seed, resolve_seed, StatsRng};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Statistic computed on each bootstrap resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum BootstrapStatistic {
    /// Arithmetic mean.
    Mean,
    /// Median.
    Median,
    /// Population standard deviation.
    StdDev,
    /// Population variance.
    Variance,
}

impl BootstrapStatistic {
    /// Evaluate the statistic on a sample.
    pub fn apply(&self, data: &[f64]) -> HydroResult<f64> {
        match self {
            BootstrapStatistic::Mean => mean(data),
            BootstrapStatistic::Median => median(data),
            BootstrapStatistic::StdDev => std_dev(data),
            BootstrapStatistic::Variance => variance(data),
        }
    }
}

/// Bootstrap configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootstrapConfig {
    /// Number of resampling rounds.
    pub iterations: usize,
    /// Significance level for the percentile confidence interval.
    pub alpha: f64,
    /// Seed for reproducible resampling; falls back to the global seed.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            alpha: 0.05,
            seed: None,
        }
    }
}

/// Bootstrap summary for one statistic.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BootstrapSummary {
    /// Statistic on the original sample.
    pub original: f64,
    /// Mean of the resampled statistics.
    pub resampled_mean: f64,
    /// Bootstrap bias, `resampled_mean - original`.
    pub bias: f64,
    /// Standard error (standard deviation of the resampled statistics).
    pub standard_error: f64,
    /// Percentile confidence interval at level `1 - alpha`.
    pub confidence_interval: (f64, f64),
    /// Significance level the interval was computed at.
    pub alpha: f64,
}

/// Bootstrap resampling with bias and percentile-interval estimation.
///
/// Draws `n` values with replacement per round, evaluates the chosen
/// statistic on each resample, and summarizes the resampled distribution.
/// Each round reseeds with [`mix_seed`] when a seed is present, so runs
/// are reproducible and streams decorrelated.
pub fn bootstrap(
    data: &[f64],
    statistic: BootstrapStatistic,
    config: &BootstrapConfig,
) -> HydroResult<BootstrapSummary> {
    validate_data_length(data, 2, "bootstrap")?;
    validate_all_finite(data, "bootstrap")?;
    validate_probability_open(config.alpha, "alpha")?;
    if config.iterations < 2 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "iterations".to_string(),
            value: config.iterations as f64,
            constraint: ">= 2".to_string(),
        });
    }

    let n = data.len();
    let original = statistic.apply(data)?;
    let seed = resolve_seed(config.seed);

    let mut rng = StatsRng::from_optional_seed(seed);
    let mut estimates = Vec::with_capacity(config.iterations);
    let mut resample = vec![0.0; n];
    for iteration in 0..config.iterations {
        if let Some(seed) = seed {
            rng = StatsRng::with_seed(mix_seed(seed, iteration));
        }
        for slot in resample.iter_mut() {
            *slot = data[rng.usize(0..n)];
        }
        let estimate = statistic.apply(&resample)?;
        if estimate.is_finite() {
            estimates.push(estimate);
        }
    }
    if estimates.len() < 2 {
        return Err(HydroStatsError::NumericalError {
            reason: "No valid bootstrap estimates generated".to_string(),
            operation: Some("bootstrap".to_string()),
        });
    }

    let resampled_mean = mean(&estimates)?;
    let bias = resampled_mean - original;
    let standard_error = (estimates
        .iter()
        .map(|e| (e - resampled_mean) * (e - resampled_mean))
        .sum::<f64>()
        / (estimates.len() - 1) as f64)
        .sqrt();

    let lower = crate::descriptive::quantile(&estimates, config.alpha / 2.0)?;
    let upper = crate::descriptive::quantile(&estimates, 1.0 - config.alpha / 2.0)?;
    log::debug!(
        "bootstrap: {} rounds, SE {:.6}, CI [{:.6}, {:.6}]",
        estimates.len(),
        standard_error,
        lower,
        upper
    );

    Ok(BootstrapSummary {
        original,
        resampled_mean,
        bias,
        standard_error,
        confidence_interval: (lower, upper),
        alpha: config.alpha,
    })
}

/// Generic Monte Carlo driver.
///
/// Invokes the callback once per iteration with the shared RNG and the
/// iteration index, collecting the returned values.
pub fn monte_carlo<F>(iterations: usize, seed: Option<u64>, mut f: F) -> HydroResult<Vec<f64>>
where
    F: FnMut(&mut StatsRng, usize) -> f64,
{
    if iterations == 0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "iterations".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    let mut rng = StatsRng::from_optional_seed(seed);
    Ok((0..iterations).map(|i| f(&mut rng, i)).collect())
}

/// Built-in Monte Carlo fallback: independent normal draws.
pub fn monte_carlo_normal(
    iterations: usize,
    mu: f64,
    sigma: f64,
    seed: Option<u64>,
) -> HydroResult<Vec<f64>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "sigma".to_string(),
            value: sigma,
            constraint: "> 0".to_string(),
        });
    }
    monte_carlo(iterations, seed, |rng, _| mu + sigma * rng.standard_normal())
}

/// Markov-chain Monte Carlo state walk over a discrete transition matrix.
///
/// Threads the current state through the supplied row-stochastic matrix,
/// selecting each next state by inverse-CDF sampling against the
/// cumulative row probabilities. Returns the visited states, starting
/// with `initial_state`.
pub fn markov_chain_monte_carlo(
    transition: &[Vec<f64>],
    initial_state: usize,
    steps: usize,
    seed: Option<u64>,
) -> HydroResult<Vec<usize>> {
    let (rows, cols) = crate::matrix::ensure_rectangular(transition)?;
    if rows != cols {
        return Err(HydroStatsError::DimensionError {
            reason: format!("Transition matrix must be square, got {}x{}", rows, cols),
        });
    }
    if initial_state >= rows {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "initial_state".to_string(),
            value: initial_state as f64,
            constraint: format!("< {}", rows),
        });
    }
    for (i, row) in transition.iter().enumerate() {
        let row_sum: f64 = row.iter().sum();
        if row.iter().any(|&p| !(0.0..=1.0).contains(&p)) || (row_sum - 1.0).abs() > 1e-9 {
            return Err(HydroStatsError::InvalidParameter {
                parameter: format!("transition row {}", i),
                value: row_sum,
                constraint: "probabilities in [0, 1] summing to 1".to_string(),
            });
        }
    }

    let mut rng = StatsRng::from_optional_seed(seed);
    let mut states = Vec::with_capacity(steps + 1);
    let mut current = initial_state;
    states.push(current);
    for _ in 0..steps {
        let draw = rng.f64();
        let mut cumulative = 0.0;
        let mut next = rows - 1;
        for (j, &p) in transition[current].iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                next = j;
                break;
            }
        }
        current = next;
        states.push(current);
    }
    Ok(states)
}

/// Gaussian random walk with drift.
///
/// Box-Muller shocks scaled by `volatility` are accumulated with `drift`
/// per step; the walk starts at zero and has `n` increments.
pub fn random_walk(
    n: usize,
    drift: f64,
    volatility: f64,
    seed: Option<u64>,
) -> HydroResult<Vec<f64>> {
    if n == 0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "n".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    if !volatility.is_finite() || volatility < 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "volatility".to_string(),
            value: volatility,
            constraint: ">= 0".to_string(),
        });
    }

    let mut rng = StatsRng::from_optional_seed(seed);
    let mut walk = Vec::with_capacity(n + 1);
    let mut position = 0.0;
    walk.push(position);
    for _ in 0..n {
        position += drift + volatility * rng.standard_normal();
        walk.push(position);
    }
    Ok(walk)
}
