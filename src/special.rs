//! Special functions underlying the distribution and testing layers.
//!
//! Gamma function via the Lanczos approximation (g = 7, 9-term series),
//! regularized incomplete Gamma via the standard series/continued-fraction
//! split, and the Hastings-type rational approximations for the normal CDF
//! and its inverse. All approximations are documented with their accuracy;
//! the chi-square CDF built on the incomplete Gamma is itself an iterative
//! approximation and callers that report p-values through it flag them as
//! approximate.

use crate::errors::{HydroResult, HydroStatsError};

/// Lanczos parameter g = 7 with the matching 9-term coefficient set.
const LANCZOS_G: f64 = 7.0;

/// Lanczos series coefficients, fixed at module load and never mutated.
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Relative tolerance for the iterative incomplete-Gamma expansions.
const INCOMPLETE_GAMMA_TOL: f64 = 1e-8;

/// Iteration budget for the incomplete-Gamma expansions.
const INCOMPLETE_GAMMA_MAX_ITER: usize = 100;

/// Gamma function via the Lanczos approximation.
///
/// Accurate to at least 6 significant digits on (0, 50]. Negative
/// non-integer arguments are handled through the reflection formula;
/// non-positive integers are poles and raise an error.
pub fn gamma(x: f64) -> HydroResult<f64> {
    if !x.is_finite() {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "x".to_string(),
            value: x,
            constraint: "finite".to_string(),
        });
    }
    if x <= 0.0 && x.fract() == 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "x".to_string(),
            value: x,
            constraint: "not a non-positive integer (pole of Gamma)".to_string(),
        });
    }

    if x < 0.5 {
        // Reflection: Gamma(x) = pi / (sin(pi x) * Gamma(1 - x))
        let reflected = gamma(1.0 - x)?;
        return Ok(std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * reflected));
    }

    let z = x - 1.0;
    let mut series = LANCZOS_COEFFS[0];
    for (i, &coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        series += coeff / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    Ok((2.0 * std::f64::consts::PI).sqrt() * t.powf(z + 0.5) * (-t).exp() * series)
}

/// Natural logarithm of the Gamma function for positive arguments.
///
/// Works in log space so large arguments (binomial coefficients for big n)
/// do not overflow.
pub fn ln_gamma(x: f64) -> HydroResult<f64> {
    if !x.is_finite() || x <= 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "x".to_string(),
            value: x,
            constraint: "> 0".to_string(),
        });
    }
    if x < 0.5 {
        // ln Gamma(x) = ln(pi / sin(pi x)) - ln Gamma(1 - x)
        let reflected = ln_gamma(1.0 - x)?;
        return Ok((std::f64::consts::PI / (std::f64::consts::PI * x).sin()).ln() - reflected);
    }

    let z = x - 1.0;
    let mut series = LANCZOS_COEFFS[0];
    for (i, &coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        series += coeff / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    Ok(0.5 * (2.0 * std::f64::consts::PI).ln() + (z + 0.5) * t.ln() - t + series.ln())
}

/// Regularized lower incomplete Gamma function P(alpha, x).
///
/// Series expansion for `x < alpha + 1`, continued fraction (modified
/// Lentz) otherwise, each iterating to a relative tolerance of 1e-8 with a
/// 100-iteration budget. Exhausting the budget raises
/// [`HydroStatsError::NonConvergence`].
pub fn lower_incomplete_gamma_regularized(alpha: f64, x: f64) -> HydroResult<f64> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "alpha".to_string(),
            value: alpha,
            constraint: "> 0".to_string(),
        });
    }
    if !x.is_finite() || x < 0.0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "x".to_string(),
            value: x,
            constraint: ">= 0".to_string(),
        });
    }
    if x == 0.0 {
        return Ok(0.0);
    }

    let log_prefactor = alpha * x.ln() - x - ln_gamma(alpha)?;

    if x < alpha + 1.0 {
        // Series: P(a, x) = e^{-x} x^a / Gamma(a) * sum x^n / (a)_{n+1}
        let mut term = 1.0 / alpha;
        let mut sum = term;
        for n in 1..=INCOMPLETE_GAMMA_MAX_ITER {
            term *= x / (alpha + n as f64);
            sum += term;
            if term.abs() < sum.abs() * INCOMPLETE_GAMMA_TOL {
                return Ok((log_prefactor.exp() * sum).clamp(0.0, 1.0));
            }
        }
        Err(HydroStatsError::NonConvergence {
            operation: "incomplete gamma series".to_string(),
            iterations: INCOMPLETE_GAMMA_MAX_ITER,
        })
    } else {
        // Continued fraction for Q(a, x) via modified Lentz
        const FPMIN: f64 = 1e-300;
        let mut b = x + 1.0 - alpha;
        let mut c = 1.0 / FPMIN;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..=INCOMPLETE_GAMMA_MAX_ITER {
            let an = -(i as f64) * (i as f64 - alpha);
            b += 2.0;
            d = an * d + b;
            if d.abs() < FPMIN {
                d = FPMIN;
            }
            c = b + an / c;
            if c.abs() < FPMIN {
                c = FPMIN;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.0).abs() < INCOMPLETE_GAMMA_TOL {
                let q = log_prefactor.exp() * h;
                return Ok((1.0 - q).clamp(0.0, 1.0));
            }
        }
        Err(HydroStatsError::NonConvergence {
            operation: "incomplete gamma continued fraction".to_string(),
            iterations: INCOMPLETE_GAMMA_MAX_ITER,
        })
    }
}

/// Error function via the Abramowitz & Stegun 7.1.26 rational approximation.
///
/// Maximum absolute error below 1.5e-7 for all real x.
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    if x.abs() > 6.0 {
        return if x > 0.0 { 1.0 } else { -1.0 };
    }

    // Hastings-type coefficients
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal cumulative distribution function.
///
/// Hastings polynomial approximation through [`erf`]; absolute error below
/// 1e-6 everywhere.
pub fn normal_cdf(z: f64) -> f64 {
    if z < -8.0 {
        return 0.0;
    }
    if z > 8.0 {
        return 1.0;
    }
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

/// Normal CDF evaluated over a sequence of z-values.
pub fn normal_cdf_many(z_values: &[f64]) -> Vec<f64> {
    z_values.iter().map(|&z| normal_cdf(z)).collect()
}

/// Inverse standard normal CDF (probit).
///
/// Abramowitz & Stegun 26.2.23 rational approximation, absolute error
/// below 4.5e-4. Sufficient for expected normal order statistics; not
/// meant for tail quantiles beyond |z| ~ 6.
pub fn normal_quantile(p: f64) -> HydroResult<f64> {
    crate::errors::validate_probability_open(p, "p")?;

    let (tail, sign) = if p < 0.5 { (p, -1.0) } else { (1.0 - p, 1.0) };
    let t = (-2.0 * tail.ln()).sqrt();

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let numerator = c0 + c1 * t + c2 * t * t;
    let denominator = 1.0 + d1 * t + d2 * t * t + d3 * t * t * t;
    Ok(sign * (t - numerator / denominator))
}

/// Chi-square CDF through the regularized incomplete Gamma.
///
/// This is the engine's series approximation of the chi-square
/// distribution; tests reporting significance through it document their
/// p-values as approximate.
pub fn chi_squared_cdf(x: f64, df: usize) -> HydroResult<f64> {
    if df == 0 {
        return Err(HydroStatsError::InvalidParameter {
            parameter: "df".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    if x <= 0.0 {
        return Ok(0.0);
    }
    lower_incomplete_gamma_regularized(df as f64 / 2.0, x / 2.0)
}
