//! Closed-form probability densities and mass functions, plus
//! Poisson-process event generation.
//!
//! Every density is a stateless function of `x` and named parameters; no
//! distribution object persists between calls. Arguments outside a
//! distribution's support return `Ok(0.0)`; shape and scale parameters are
//! rejected only where they would produce non-finite results.

use crate::errors::{HydroResult, HydroStatsError};
use crate::rng::StatsRng;
use crate::special::ln_gamma;

const SQRT_TWO_PI: f64 = 2.506_628_274_631_000_5;

fn validate_positive(value: f64, name: &str) -> HydroResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "> 0".to_string(),
        });
    }
    Ok(())
}

/// Normal density with mean `mu` and standard deviation `sigma`.
pub fn normal_pdf(x: f64, mu: f64, sigma: f64) -> HydroResult<f64> {
    validate_positive(sigma, "sigma")?;
    let z = (x - mu) / sigma;
    Ok((-0.5 * z * z).exp() / (sigma * SQRT_TWO_PI))
}

/// Lognormal density; `mu` and `sigma` parameterize the underlying normal.
pub fn lognormal_pdf(x: f64, mu: f64, sigma: f64) -> HydroResult<f64> {
    validate_positive(sigma, "sigma")?;
    if x <= 0.0 {
        return Ok(0.0);
    }
    let z = (x.ln() - mu) / sigma;
    Ok((-0.5 * z * z).exp() / (x * sigma * SQRT_TWO_PI))
}

/// Gamma density with shape `k` and scale `theta`. Negative `x` is outside
/// the support and yields zero.
pub fn gamma_pdf(x: f64, shape: f64, scale: f64) -> HydroResult<f64> {
    validate_positive(shape, "shape")?;
    validate_positive(scale, "scale")?;
    if x <= 0.0 {
        return Ok(0.0);
    }
    let log_density =
        (shape - 1.0) * x.ln() - x / scale - ln_gamma(shape)? - shape * scale.ln();
    Ok(log_density.exp())
}

/// Beta density on [0, 1] with shape parameters `a` and `b`.
///
/// The endpoints return zero rather than the infinities that arise for
/// shape parameters below one.
pub fn beta_pdf(x: f64, a: f64, b: f64) -> HydroResult<f64> {
    validate_positive(a, "a")?;
    validate_positive(b, "b")?;
    if x <= 0.0 || x >= 1.0 {
        return Ok(0.0);
    }
    let log_beta = ln_gamma(a)? + ln_gamma(b)? - ln_gamma(a + b)?;
    let log_density = (a - 1.0) * x.ln() + (b - 1.0) * (1.0 - x).ln() - log_beta;
    Ok(log_density.exp())
}

/// Weibull density with shape `k` and scale `lambda`.
pub fn weibull_pdf(x: f64, shape: f64, scale: f64) -> HydroResult<f64> {
    validate_positive(shape, "shape")?;
    validate_positive(scale, "scale")?;
    if x < 0.0 {
        return Ok(0.0);
    }
    if x == 0.0 {
        // Only the exponential case has a finite, nonzero density at the origin
        return Ok(if shape == 1.0 { 1.0 / scale } else { 0.0 });
    }
    let t = x / scale;
    Ok((shape / scale) * t.powf(shape - 1.0) * (-t.powf(shape)).exp())
}

/// Exponential density with rate `lambda`.
pub fn exponential_pdf(x: f64, lambda: f64) -> HydroResult<f64> {
    validate_positive(lambda, "lambda")?;
    if x < 0.0 {
        return Ok(0.0);
    }
    Ok(lambda * (-lambda * x).exp())
}

/// Gumbel (extreme value type I) density with location `mu` and scale `beta`.
pub fn gumbel_pdf(x: f64, mu: f64, beta: f64) -> HydroResult<f64> {
    validate_positive(beta, "beta")?;
    let z = (x - mu) / beta;
    Ok((-(z + (-z).exp())).exp() / beta)
}

/// Generalized Extreme Value density with location `mu`, scale `sigma`, and
/// shape `xi`.
///
/// The shape parameter unifies the Gumbel (`xi -> 0`), Fréchet (`xi > 0`),
/// and reversed-Weibull (`xi < 0`) families. Points outside the support
/// implied by `xi` yield zero.
pub fn gev_pdf(x: f64, mu: f64, sigma: f64, xi: f64) -> HydroResult<f64> {
    validate_positive(sigma, "sigma")?;
    if !xi.is_finite() {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "xi".to_string(),
            value: xi,
            constraint: "finite".to_string(),
        });
    }

    // Gumbel limit for vanishing shape
    if xi.abs() < 1e-12 {
        return gumbel_pdf(x, mu, sigma);
    }

    let t = 1.0 + xi * (x - mu) / sigma;
    if t <= 0.0 {
        return Ok(0.0);
    }
    let inv_xi = 1.0 / xi;
    Ok(t.powf(-inv_xi - 1.0) * (-t.powf(-inv_xi)).exp() / sigma)
}

/// Uniform density on [a, b].
pub fn uniform_pdf(x: f64, a: f64, b: f64) -> HydroResult<f64> {
    if !(a < b) {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "a".to_string(),
            value: a,
            constraint: format!("< b ({})", b),
        });
    }
    if x < a || x > b {
        return Ok(0.0);
    }
    Ok(1.0 / (b - a))
}

/// Bernoulli mass function; `k` outside {0, 1} yields zero.
pub fn bernoulli_pmf(k: u64, p: f64) -> HydroResult<f64> {
    crate::errors::validate_parameter(p, 0.0, 1.0, "p")?;
    Ok(match k {
        0 => 1.0 - p,
        1 => p,
        _ => 0.0,
    })
}

/// Binomial mass function for `k` successes in `n` trials.
///
/// Computed in log space through `ln_gamma` so large `n` does not
/// overflow the binomial coefficient.
pub fn binomial_pmf(k: u64, n: u64, p: f64) -> HydroResult<f64> {
    crate::errors::validate_parameter(p, 0.0, 1.0, "p")?;
    if k > n {
        return Ok(0.0);
    }
    // Degenerate endpoints would take ln(0) below
    if p == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    if p == 1.0 {
        return Ok(if k == n { 1.0 } else { 0.0 });
    }
    let log_coeff = ln_gamma(n as f64 + 1.0)?
        - ln_gamma(k as f64 + 1.0)?
        - ln_gamma((n - k) as f64 + 1.0)?;
    let log_pmf = log_coeff + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    Ok(log_pmf.exp())
}

/// Geometric mass function on the number of trials until the first
/// success (`k >= 1`): `(1 - p)^(k-1) p`.
pub fn geometric_pmf(k: u64, p: f64) -> HydroResult<f64> {
    crate::errors::validate_probability_open(p, "p")?;
    if k == 0 {
        return Ok(0.0);
    }
    Ok((1.0 - p).powi((k - 1) as i32) * p)
}

/// Logarithmic-series mass function on `k >= 1`.
pub fn logseries_pmf(k: u64, p: f64) -> HydroResult<f64> {
    crate::errors::validate_probability_open(p, "p")?;
    if k == 0 {
        return Ok(0.0);
    }
    Ok(-p.powi(k as i32) / (k as f64 * (1.0 - p).ln()))
}

/// Poisson mass function with rate `lambda`.
pub fn poisson_pmf(k: u64, lambda: f64) -> HydroResult<f64> {
    validate_positive(lambda, "lambda")?;
    let log_pmf = k as f64 * lambda.ln() - lambda - ln_gamma(k as f64 + 1.0)?;
    Ok(log_pmf.exp())
}

/// Multinomial mass function for category counts under category
/// probabilities that sum to one.
pub fn multinomial_pmf(counts: &[u64], probabilities: &[f64]) -> HydroResult<f64> {
    if counts.len() != probabilities.len() {
        return Err(HydroStatsError::LengthMismatch {
            expected: counts.len(),
            actual: probabilities.len(),
        });
    }
    if counts.is_empty() {
        return Err(HydroStatsError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let prob_sum: f64 = probabilities.iter().sum();
    if (prob_sum - 1.0).abs() > 1e-9 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "probabilities".to_string(),
            value: prob_sum,
            constraint: "sum to 1".to_string(),
        });
    }

    let total: u64 = counts.iter().sum();
    let mut log_pmf = ln_gamma(total as f64 + 1.0)?;
    for (&k, &p) in counts.iter().zip(probabilities.iter()) {
        if p < 0.0 || p > 1.0 {
            return Err(HydroStatsError::InvalidParameter {
                parameter: "probabilities".to_string(),
                value: p,
                constraint: "[0, 1]".to_string(),
            });
        }
        if k > 0 && p == 0.0 {
            return Ok(0.0);
        }
        log_pmf -= ln_gamma(k as f64 + 1.0)?;
        if k > 0 {
            log_pmf += k as f64 * p.ln();
        }
    }
    Ok(log_pmf.exp())
}

/// Timestamps of a homogeneous Poisson process on `[0, horizon)`.
///
/// Exponential inter-arrival times `-ln(U)/lambda` are accumulated until
/// the cumulative time passes the horizon.
pub fn poisson_process_times(
    lambda: f64,
    horizon: f64,
    seed: Option<u64>,
) -> HydroResult<Vec<f64>> {
    validate_positive(lambda, "lambda")?;
    validate_positive(horizon, "horizon")?;

    let mut rng = StatsRng::from_optional_seed(seed);
    let mut times = Vec::new();
    let mut t = 0.0;
    loop {
        t += -rng.f64_open().ln() / lambda;
        if t >= horizon {
            break;
        }
        times.push(t);
    }
    Ok(times)
}

/// Per-unit-interval event counts of a homogeneous Poisson process.
///
/// Counts are binned from the time-mode output; the horizon is rounded up
/// to whole unit intervals.
pub fn poisson_process_counts(
    lambda: f64,
    horizon: f64,
    seed: Option<u64>,
) -> HydroResult<Vec<usize>> {
    let times = poisson_process_times(lambda, horizon, seed)?;
    let bins = horizon.ceil() as usize;
    let mut counts = vec![0usize; bins.max(1)];
    for t in times {
        let bin = (t.floor() as usize).min(counts.len() - 1);
        counts[bin] += 1;
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_normal_pdf_peak_and_symmetry() {
        let peak = normal_pdf(0.0, 0.0, 1.0).unwrap();
        assert_approx_eq!(peak, 1.0 / SQRT_TWO_PI, 1e-12);
        assert_approx_eq!(
            normal_pdf(1.3, 0.0, 1.0).unwrap(),
            normal_pdf(-1.3, 0.0, 1.0).unwrap(),
            1e-12
        );
        assert!(normal_pdf(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_positive_support_returns_zero_below() {
        assert_eq!(gamma_pdf(-1.0, 2.0, 1.0).unwrap(), 0.0);
        assert_eq!(weibull_pdf(-0.1, 1.5, 2.0).unwrap(), 0.0);
        assert_eq!(exponential_pdf(-2.0, 0.5).unwrap(), 0.0);
        assert_eq!(lognormal_pdf(0.0, 0.0, 1.0).unwrap(), 0.0);
        assert_eq!(beta_pdf(1.5, 2.0, 2.0).unwrap(), 0.0);
    }

    #[test]
    fn test_exponential_is_gamma_shape_one() {
        for &x in &[0.1, 1.0, 3.0] {
            assert_approx_eq!(
                gamma_pdf(x, 1.0, 2.0).unwrap(),
                exponential_pdf(x, 0.5).unwrap(),
                1e-12
            );
        }
    }

    #[test]
    fn test_weibull_shape_one_is_exponential() {
        for &x in &[0.5, 1.0, 4.0] {
            assert_approx_eq!(
                weibull_pdf(x, 1.0, 2.0).unwrap(),
                exponential_pdf(x, 0.5).unwrap(),
                1e-12
            );
        }
    }

    #[test]
    fn test_beta_uniform_case() {
        // Beta(1, 1) is the standard uniform
        for &x in &[0.2, 0.5, 0.9] {
            assert_approx_eq!(beta_pdf(x, 1.0, 1.0).unwrap(), 1.0, 1e-10);
        }
    }

    #[test]
    fn test_gev_gumbel_limit() {
        // Vanishing shape parameter reduces GEV to Gumbel
        for &x in &[-1.0, 0.0, 2.5] {
            assert_approx_eq!(
                gev_pdf(x, 0.5, 2.0, 0.0).unwrap(),
                gumbel_pdf(x, 0.5, 2.0).unwrap(),
                1e-12
            );
        }
        // Frechet support bound: density is zero below mu - sigma/xi
        assert_eq!(gev_pdf(-10.0, 0.0, 1.0, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_uniform_pdf() {
        assert_approx_eq!(uniform_pdf(0.5, 0.0, 2.0).unwrap(), 0.5, 1e-12);
        assert_eq!(uniform_pdf(3.0, 0.0, 2.0).unwrap(), 0.0);
        assert!(uniform_pdf(0.5, 2.0, 2.0).is_err());
    }

    #[test]
    fn test_bernoulli_and_binomial_agree() {
        for &p in &[0.2, 0.5, 0.8] {
            assert_approx_eq!(
                bernoulli_pmf(1, p).unwrap(),
                binomial_pmf(1, 1, p).unwrap(),
                1e-12
            );
        }
        assert_eq!(bernoulli_pmf(2, 0.5).unwrap(), 0.0);
    }

    #[test]
    fn test_binomial_pmf_sums_to_one() {
        let n = 12;
        let p = 0.3;
        let total: f64 = (0..=n).map(|k| binomial_pmf(k, n, p).unwrap()).sum();
        assert_approx_eq!(total, 1.0, 1e-10);
        assert_eq!(binomial_pmf(13, 12, 0.3).unwrap(), 0.0);
        assert_eq!(binomial_pmf(0, 10, 0.0).unwrap(), 1.0);
        assert_eq!(binomial_pmf(10, 10, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_geometric_pmf_sums_close_to_one() {
        let p = 0.4;
        let total: f64 = (1..200).map(|k| geometric_pmf(k, p).unwrap()).sum();
        assert_approx_eq!(total, 1.0, 1e-10);
        assert_eq!(geometric_pmf(0, 0.4).unwrap(), 0.0);
    }

    #[test]
    fn test_logseries_pmf_sums_close_to_one() {
        let p = 0.5;
        let total: f64 = (1..200).map(|k| logseries_pmf(k, p).unwrap()).sum();
        assert_approx_eq!(total, 1.0, 1e-10);
    }

    #[test]
    fn test_poisson_pmf_known_value() {
        // P(X = 2) for lambda = 3 is 9 e^{-3} / 2
        assert_approx_eq!(
            poisson_pmf(2, 3.0).unwrap(),
            4.5 * (-3.0_f64).exp(),
            1e-10
        );
    }

    #[test]
    fn test_multinomial_pmf_binomial_reduction() {
        // Two categories reduce to binomial
        let pmf = multinomial_pmf(&[3, 7], &[0.3, 0.7]).unwrap();
        assert_approx_eq!(pmf, binomial_pmf(3, 10, 0.3).unwrap(), 1e-10);
        assert!(multinomial_pmf(&[1, 2], &[0.3, 0.3]).is_err());
        assert!(multinomial_pmf(&[1], &[0.5, 0.5]).is_err());
    }

    #[test]
    fn test_poisson_process_times_within_horizon() {
        let times = poisson_process_times(2.0, 50.0, Some(42)).unwrap();
        assert!(!times.is_empty());
        assert!(times.iter().all(|&t| t > 0.0 && t < 50.0));
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        // Event count should be near lambda * horizon = 100
        let n = times.len() as f64;
        assert!((n - 100.0).abs() < 40.0, "count {} implausible", n);
    }

    #[test]
    fn test_poisson_process_counts_match_times() {
        let seed = Some(7);
        let times = poisson_process_times(1.5, 20.0, seed).unwrap();
        let counts = poisson_process_counts(1.5, 20.0, seed).unwrap();
        assert_eq!(counts.len(), 20);
        assert_eq!(counts.iter().sum::<usize>(), times.len());
    }

    #[test]
    fn test_poisson_process_rejects_bad_parameters() {
        assert!(poisson_process_times(0.0, 10.0, None).is_err());
        assert!(poisson_process_times(1.0, 0.0, None).is_err());
    }
}
