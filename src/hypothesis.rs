//! Hypothesis tests for hydrological time series.
//!
//! Trend (Mann-Kendall), distribution equality (two-sample
//! Kolmogorov-Smirnov), location (t family, one-way ANOVA), rank-based
//! nonparametric tests (Mann-Whitney U, Wilcoxon signed-rank), normality
//! (Shapiro-Francia, Anderson-Darling), and heteroscedasticity (White,
//! Breusch-Pagan, Goldfeld-Quandt).
//!
//! P-value fidelity varies by test and is documented per function: the
//! rank tests use normal approximations, the Shapiro-Francia p-value is a
//! Royston normalization of an already-simplified statistic, and the
//! heteroscedasticity tests report significance through the engine's
//! series-approximated chi-square CDF. None of these are exact
//! distributions and none are silently upgraded.

use crate::descriptive::{float_total_cmp, mean, sample_variance};
use crate::errors::{
    validate_data_length, validate_equal_length, validate_parameter, HydroResult,
    HydroStatsError,
};
use crate::matrix::{ols_fit, simple_linear_regression};
use crate::special::{chi_squared_cdf, normal_cdf, normal_quantile};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of evaluation points for the two-sample KS grid.
const KS_GRID_POINTS: usize = 1000;

/// Stephens (1974) interpolation bands for the Anderson-Darling p-value:
/// `(upper_bound, c0, c1, c2, complemented)`. The p-value is
/// `exp(c0 + c1 A + c2 A^2)`, or one minus that when `complemented`.
const STEPHENS_BANDS: [(f64, f64, f64, f64, bool); 4] = [
    (0.2, -13.436, 101.14, -223.73, true),
    (0.34, -8.318, 42.796, -59.938, true),
    (0.6, 0.9177, -4.279, -1.38, false),
    (f64::INFINITY, 1.2937, -5.709, 0.0186, false),
];

/// Direction of a monotonic trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrendDirection {
    /// Positive z-statistic.
    Increasing,
    /// Negative z-statistic.
    Decreasing,
    /// Zero z-statistic.
    NoTrend,
}

/// Mann-Kendall trend test result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MannKendallTest {
    /// Kendall S statistic, the signed count over all pairs.
    pub s: i64,
    /// Variance of S under the null.
    pub variance: f64,
    /// Continuity-corrected z-statistic.
    pub z: f64,
    /// Two-tailed p-value from the normal CDF.
    pub p_value: f64,
    /// Trend label from the sign of z.
    pub trend: TrendDirection,
    /// True when `p_value < alpha`.
    pub significant: bool,
}

/// Two-sample Kolmogorov-Smirnov test result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KsTest {
    /// Maximum absolute difference between the empirical CDFs.
    pub d_statistic: f64,
    /// Asymptotic p-value `2 exp(-2 D^2 nm / (n + m))`.
    pub p_value: f64,
    /// True when `p_value < alpha`.
    pub reject: bool,
}

/// A t-statistic with its degrees of freedom.
///
/// The engine carries no t-distribution CDF, so no p-value is computed;
/// the caller combines `t` and `df` with a t CDF of its choosing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TTest {
    /// t statistic.
    pub t: f64,
    /// Degrees of freedom.
    pub df: usize,
}

/// Variance-ratio F test result. Like the t family, no p-value is
/// computed; the statistic and degrees of freedom are returned.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FTest {
    /// Variance ratio with the larger sample variance in the numerator.
    pub f: f64,
    /// Numerator degrees of freedom.
    pub df_numerator: usize,
    /// Denominator degrees of freedom.
    pub df_denominator: usize,
}

/// One-way ANOVA result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anova {
    /// F statistic, between-group over within-group mean square.
    pub f: f64,
    /// Between-group degrees of freedom, `k - 1`.
    pub df_between: usize,
    /// Within-group degrees of freedom, `N - k`.
    pub df_within: usize,
    /// Between-group sum of squares.
    pub ss_between: f64,
    /// Within-group sum of squares.
    pub ss_within: f64,
}

/// Mann-Whitney U test result (normal approximation).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MannWhitneyTest {
    /// Smaller of the two U statistics.
    pub u: f64,
    /// Normal-approximation z-statistic.
    pub z: f64,
    /// Two-tailed approximate p-value.
    pub p_value: f64,
}

/// Wilcoxon signed-rank test result (normal approximation).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WilcoxonTest {
    /// Smaller of the positive and negative rank sums.
    pub w: f64,
    /// Normal-approximation z-statistic.
    pub z: f64,
    /// Two-tailed approximate p-value.
    pub p_value: f64,
}

/// Shapiro-Francia normality test result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapiroWilkTest {
    /// W statistic; the authoritative output of this test.
    pub w: f64,
    /// Approximate p-value via the Royston (1993) normalization.
    pub p_value: f64,
}

/// Anderson-Darling normality test result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AndersonDarlingTest {
    /// Raw A-squared statistic.
    pub a_squared: f64,
    /// Small-sample corrected statistic `A^2 (1 + 0.75/n + 2.25/n^2)`.
    pub a_squared_star: f64,
    /// P-value interpolated from the Stephens (1974) bands.
    pub p_value: f64,
}

/// Heteroscedasticity test result shared by White, Breusch-Pagan, and
/// Goldfeld-Quandt. The p-value comes from the engine's approximate
/// chi-square CDF.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeteroscedasticityTest {
    /// Test statistic (LM statistic, or RSS ratio for Goldfeld-Quandt).
    pub statistic: f64,
    /// Degrees of freedom of the approximating chi-square.
    pub df: usize,
    /// Approximate p-value.
    pub p_value: f64,
}

// ============================================================================
// TREND AND DISTRIBUTION TESTS
// ============================================================================

/// Mann-Kendall trend test.
///
/// `S = sum sign(x_j - x_i)` over all `i < j` pairs, O(n^2). The variance
/// of S applies the tie correction for `n <= 10` and the standard
/// asymptotic formula otherwise; the z-statistic uses the continuity
/// correction `(S -/+ 1) / sigma` and the two-tailed p-value comes from
/// the normal CDF.
pub fn mann_kendall(data: &[f64], alpha: f64) -> HydroResult<MannKendallTest> {
    validate_data_length(data, 3, "Mann-Kendall test")?;
    validate_parameter(alpha, 0.0, 1.0, "alpha")?;

    let n = data.len();
    let mut s: i64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = data[j] - data[i];
            if diff > 0.0 {
                s += 1;
            } else if diff < 0.0 {
                s -= 1;
            }
        }
    }

    let nf = n as f64;
    let mut variance = nf * (nf - 1.0) * (2.0 * nf + 5.0) / 18.0;
    if n <= 10 {
        // Tie correction: subtract sum t(t-1)(2t+5)/18 over tie groups
        let mut sorted = data.to_vec();
        sorted.sort_by(float_total_cmp);
        let mut i = 0;
        while i < n {
            let mut run = 1;
            while i + run < n && sorted[i + run] == sorted[i] {
                run += 1;
            }
            if run > 1 {
                let t = run as f64;
                variance -= t * (t - 1.0) * (2.0 * t + 5.0) / 18.0;
            }
            i += run;
        }
    }
    if variance <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance of S: series is entirely tied".to_string(),
            operation: Some("mann_kendall".to_string()),
        });
    }

    let sigma = variance.sqrt();
    let z = if s > 0 {
        (s as f64 - 1.0) / sigma
    } else if s < 0 {
        (s as f64 + 1.0) / sigma
    } else {
        0.0
    };
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));

    let trend = if z > 0.0 {
        TrendDirection::Increasing
    } else if z < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::NoTrend
    };

    Ok(MannKendallTest {
        s,
        variance,
        z,
        p_value,
        trend,
        significant: p_value < alpha,
    })
}

/// Empirical CDF of `sample` at `x` (proportion of values <= x).
fn empirical_cdf(sorted: &[f64], x: f64) -> f64 {
    // partition_point gives the count of elements <= x on sorted data
    sorted.partition_point(|&v| v <= x) as f64 / sorted.len() as f64
}

/// Two-sample Kolmogorov-Smirnov test.
///
/// Empirical CDFs are evaluated on a fixed 1000-point grid spanning the
/// combined range of both samples; the D statistic is the maximum
/// absolute CDF difference and the asymptotic p-value is
/// `2 exp(-2 D^2 nm / (n + m))`, clamped to [0, 1].
pub fn ks_test(sample_a: &[f64], sample_b: &[f64], alpha: f64) -> HydroResult<KsTest> {
    validate_data_length(sample_a, 2, "KS test")?;
    validate_data_length(sample_b, 2, "KS test")?;
    validate_parameter(alpha, 0.0, 1.0, "alpha")?;

    let mut sorted_a = sample_a.to_vec();
    let mut sorted_b = sample_b.to_vec();
    sorted_a.sort_by(float_total_cmp);
    sorted_b.sort_by(float_total_cmp);

    let low = sorted_a[0].min(sorted_b[0]);
    let high = sorted_a[sorted_a.len() - 1].max(sorted_b[sorted_b.len() - 1]);
    if !(high - low).is_finite() {
        return Err(HydroStatsError::NumericalError {
            reason: "Non-finite sample range".to_string(),
            operation: Some("ks_test".to_string()),
        });
    }

    let step = (high - low) / (KS_GRID_POINTS - 1) as f64;
    let mut d_statistic: f64 = 0.0;
    for i in 0..KS_GRID_POINTS {
        let x = low + step * i as f64;
        let diff = (empirical_cdf(&sorted_a, x) - empirical_cdf(&sorted_b, x)).abs();
        d_statistic = d_statistic.max(diff);
    }

    let n = sample_a.len() as f64;
    let m = sample_b.len() as f64;
    let p_value =
        (2.0 * (-2.0 * d_statistic * d_statistic * n * m / (n + m)).exp()).clamp(0.0, 1.0);

    Ok(KsTest {
        d_statistic,
        p_value,
        reject: p_value < alpha,
    })
}

// ============================================================================
// LOCATION TESTS
// ============================================================================

/// One-sample t-test against a hypothesized mean.
pub fn t_test_one_sample(data: &[f64], mu: f64) -> HydroResult<TTest> {
    validate_data_length(data, 2, "one-sample t-test")?;
    let n = data.len();
    let sample_mean = mean(data)?;
    let variance = sample_variance(data)?;
    if variance <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero sample variance: t statistic undefined".to_string(),
            operation: Some("t_test_one_sample".to_string()),
        });
    }
    Ok(TTest {
        t: (sample_mean - mu) / (variance / n as f64).sqrt(),
        df: n - 1,
    })
}

/// Two-sample pooled-variance t-test.
pub fn t_test_two_sample(a: &[f64], b: &[f64]) -> HydroResult<TTest> {
    validate_data_length(a, 2, "two-sample t-test")?;
    validate_data_length(b, 2, "two-sample t-test")?;
    let n1 = a.len();
    let n2 = b.len();
    let df = n1 + n2 - 2;
    let pooled = ((n1 - 1) as f64 * sample_variance(a)? + (n2 - 1) as f64 * sample_variance(b)?)
        / df as f64;
    if pooled <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero pooled variance: t statistic undefined".to_string(),
            operation: Some("t_test_two_sample".to_string()),
        });
    }
    let standard_error = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    Ok(TTest {
        t: (mean(a)? - mean(b)?) / standard_error,
        df,
    })
}

/// Paired t-test on the element-wise differences.
pub fn t_test_paired(a: &[f64], b: &[f64]) -> HydroResult<TTest> {
    validate_equal_length(a, b)?;
    let differences: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x - y).collect();
    t_test_one_sample(&differences, 0.0)
}

/// Variance-ratio F test with the larger sample variance in the numerator.
pub fn f_test(a: &[f64], b: &[f64]) -> HydroResult<FTest> {
    validate_data_length(a, 2, "F test")?;
    validate_data_length(b, 2, "F test")?;
    let var_a = sample_variance(a)?;
    let var_b = sample_variance(b)?;
    if var_a <= 0.0 || var_b <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero sample variance: F ratio undefined".to_string(),
            operation: Some("f_test".to_string()),
        });
    }
    if var_a >= var_b {
        Ok(FTest {
            f: var_a / var_b,
            df_numerator: a.len() - 1,
            df_denominator: b.len() - 1,
        })
    } else {
        Ok(FTest {
            f: var_b / var_a,
            df_numerator: b.len() - 1,
            df_denominator: a.len() - 1,
        })
    }
}

/// One-way ANOVA over `k` groups.
pub fn anova_one_way(groups: &[Vec<f64>]) -> HydroResult<Anova> {
    if groups.len() < 2 {
        return Err(HydroStatsError::DimensionError {
            reason: format!("ANOVA needs at least 2 groups, got {}", groups.len()),
        });
    }
    for group in groups {
        validate_data_length(group, 2, "ANOVA group")?;
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let grand_total: f64 = groups.iter().flat_map(|g| g.iter()).sum();
    let grand_mean = grand_total / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group)?;
        ss_between += group.len() as f64 * (group_mean - grand_mean) * (group_mean - grand_mean);
        ss_within += group
            .iter()
            .map(|x| (x - group_mean) * (x - group_mean))
            .sum::<f64>();
    }

    let df_between = groups.len() - 1;
    let df_within = total_n - groups.len();
    if ss_within <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero within-group variation: F undefined".to_string(),
            operation: Some("anova_one_way".to_string()),
        });
    }

    Ok(Anova {
        f: (ss_between / df_between as f64) / (ss_within / df_within as f64),
        df_between,
        df_within,
        ss_between,
        ss_within,
    })
}

// ============================================================================
// RANK-BASED TESTS
// ============================================================================

/// Midranks of the values (1-based, ties averaged). Returns the ranks in
/// the input order together with the tie-group sizes.
fn midranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| float_total_cmp(&values[i], &values[j]));

    let mut ranks = vec![0.0; n];
    let mut tie_sizes = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Average rank of positions i..=j (1-based)
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        if j > i {
            tie_sizes.push(j - i + 1);
        }
        i = j + 1;
    }
    (ranks, tie_sizes)
}

/// Mann-Whitney U test with midrank tie handling.
///
/// Significance uses the normal approximation with tie-corrected
/// variance; this is an approximation, reliable mainly for moderate to
/// large samples, and a warning is logged when either sample has fewer
/// than 8 observations.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> HydroResult<MannWhitneyTest> {
    validate_data_length(a, 2, "Mann-Whitney U")?;
    validate_data_length(b, 2, "Mann-Whitney U")?;
    if a.len() < 8 || b.len() < 8 {
        log::warn!(
            "Mann-Whitney normal approximation is weak for n1={}, n2={}",
            a.len(),
            b.len()
        );
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let combined: Vec<f64> = a.iter().chain(b.iter()).cloned().collect();
    let (ranks, tie_sizes) = midranks(&combined);

    let rank_sum_a: f64 = ranks[..a.len()].iter().sum();
    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = u1.min(u2);

    let n = n1 + n2;
    let tie_term: f64 = tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum();
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance of U: all observations tied".to_string(),
            operation: Some("mann_whitney_u".to_string()),
        });
    }

    let z = (u - n1 * n2 / 2.0) / variance.sqrt();
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));
    Ok(MannWhitneyTest { u, z, p_value })
}

/// Wilcoxon signed-rank test on paired samples with midrank tie handling.
///
/// Zero differences are dropped; significance uses the normal
/// approximation, documented as an approximation for small n.
pub fn wilcoxon_signed_rank(a: &[f64], b: &[f64]) -> HydroResult<WilcoxonTest> {
    validate_equal_length(a, b)?;
    let differences: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| x - y)
        .filter(|d| *d != 0.0)
        .collect();
    if differences.len() < 2 {
        return Err(HydroStatsError::InsufficientData {
            required: 2,
            actual: differences.len(),
        });
    }
    if differences.len() < 10 {
        log::warn!(
            "Wilcoxon normal approximation is weak for n={} nonzero differences",
            differences.len()
        );
    }

    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let (ranks, _) = midranks(&magnitudes);

    let w_positive: f64 = differences
        .iter()
        .zip(ranks.iter())
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let n = differences.len() as f64;
    let w_negative = n * (n + 1.0) / 2.0 - w_positive;
    let w = w_positive.min(w_negative);

    let mu = n * (n + 1.0) / 4.0;
    let sigma = (n * (n + 1.0) * (2.0 * n + 1.0) / 24.0).sqrt();
    let z = (w - mu) / sigma;
    let p_value = 2.0 * (1.0 - normal_cdf(z.abs()));
    Ok(WilcoxonTest { w, z, p_value })
}

// ============================================================================
// NORMALITY TESTS
// ============================================================================

/// Shapiro-Wilk normality test, Shapiro-Francia simplification.
///
/// Weights come from expected normal order statistics through the probit
/// approximation (Blom scores) rather than the full Royston coefficient
/// tables, so the W statistic is the authoritative output. The p-value is
/// the Royston (1993) Shapiro-Francia normalization and is intentionally
/// approximate.
pub fn shapiro_wilk(data: &[f64]) -> HydroResult<ShapiroWilkTest> {
    validate_data_length(data, 5, "Shapiro-Wilk test")?;
    let n = data.len();
    if n < 20 {
        log::warn!("Shapiro-Francia p-value normalization is weak for n={}", n);
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(float_total_cmp);

    // Blom expected normal order statistics
    let mut scores = Vec::with_capacity(n);
    for i in 1..=n {
        let p = (i as f64 - 0.375) / (n as f64 + 0.25);
        scores.push(normal_quantile(p)?);
    }

    let sample_mean = mean(&sorted)?;
    let sum_sq_dev: f64 = sorted
        .iter()
        .map(|x| (x - sample_mean) * (x - sample_mean))
        .sum();
    if sum_sq_dev <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: W undefined for constant series".to_string(),
            operation: Some("shapiro_wilk".to_string()),
        });
    }

    let weighted_sum: f64 = scores.iter().zip(sorted.iter()).map(|(m, x)| m * x).sum();
    let score_norm: f64 = scores.iter().map(|m| m * m).sum();
    let w = (weighted_sum * weighted_sum / (score_norm * sum_sq_dev)).min(1.0);

    // Royston (1993) normalization of ln(1 - W')
    let u = (n as f64).ln();
    let v = u.ln();
    let mu = -1.2725 + 1.0521 * (v - u);
    let sigma = 1.0308 - 0.26758 * (v + 2.0 / u);
    let p_value = if w >= 1.0 {
        1.0
    } else {
        let z = ((1.0 - w).ln() - mu) / sigma;
        (1.0 - normal_cdf(z)).clamp(0.0, 1.0)
    };

    Ok(ShapiroWilkTest { w, p_value })
}

/// Anderson-Darling normality test with estimated mean and variance.
///
/// Full A-squared statistic with the small-sample correction, p-value
/// interpolated from the Stephens (1974) bands.
pub fn anderson_darling(data: &[f64]) -> HydroResult<AndersonDarlingTest> {
    validate_data_length(data, 8, "Anderson-Darling test")?;
    let n = data.len();

    let sample_mean = mean(data)?;
    let variance = sample_variance(data)?;
    if variance <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero variance: A-squared undefined for constant series".to_string(),
            operation: Some("anderson_darling".to_string()),
        });
    }
    let sd = variance.sqrt();

    let mut sorted = data.to_vec();
    sorted.sort_by(float_total_cmp);

    // Probability transforms, clamped away from 0 and 1 before the logs
    let transforms: Vec<f64> = sorted
        .iter()
        .map(|x| normal_cdf((x - sample_mean) / sd).clamp(1e-12, 1.0 - 1e-12))
        .collect();

    let nf = n as f64;
    let mut sum = 0.0;
    for i in 0..n {
        sum += (2.0 * (i as f64 + 1.0) - 1.0)
            * (transforms[i].ln() + (1.0 - transforms[n - 1 - i]).ln());
    }
    let a_squared = -nf - sum / nf;
    let a_squared_star = a_squared * (1.0 + 0.75 / nf + 2.25 / (nf * nf));

    let mut p_value = 1.0;
    for &(upper, c0, c1, c2, complemented) in STEPHENS_BANDS.iter() {
        if a_squared_star <= upper {
            let raw =
                (c0 + c1 * a_squared_star + c2 * a_squared_star * a_squared_star).exp();
            p_value = if complemented { 1.0 - raw } else { raw };
            break;
        }
    }

    Ok(AndersonDarlingTest {
        a_squared,
        a_squared_star,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

// ============================================================================
// HETEROSCEDASTICITY TESTS
// ============================================================================

/// R-squared of a fit given its residuals and the response.
fn r_squared_from_residuals(residuals: &[f64], y: &[f64]) -> HydroResult<f64> {
    let y_mean = mean(y)?;
    let tss: f64 = y.iter().map(|v| (v - y_mean) * (v - y_mean)).sum();
    if tss <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero total variation in auxiliary response".to_string(),
            operation: Some("r_squared_from_residuals".to_string()),
        });
    }
    let rss: f64 = residuals.iter().map(|r| r * r).sum();
    Ok((1.0 - rss / tss).clamp(0.0, 1.0))
}

/// Breusch-Pagan heteroscedasticity test.
///
/// Regresses squared residuals of `y ~ x` on `x`; the LM statistic
/// `n R^2` is compared against the approximate chi-square CDF with one
/// degree of freedom. The p-value inherits the approximation.
pub fn breusch_pagan(x: &[f64], y: &[f64]) -> HydroResult<HeteroscedasticityTest> {
    validate_equal_length(x, y)?;
    let (_, _, residuals) = simple_linear_regression(x, y)?;
    let squared: Vec<f64> = residuals.iter().map(|r| r * r).collect();

    let (_, _, aux_residuals) = simple_linear_regression(x, &squared)?;
    let r_squared = r_squared_from_residuals(&aux_residuals, &squared)?;
    let statistic = x.len() as f64 * r_squared;
    let df = 1;
    Ok(HeteroscedasticityTest {
        statistic,
        df,
        p_value: (1.0 - chi_squared_cdf(statistic, df)?).clamp(0.0, 1.0),
    })
}

/// White's heteroscedasticity test.
///
/// Auxiliary regression of squared residuals on the regressor and its
/// square; `n R^2` against the approximate chi-square CDF with two
/// degrees of freedom.
pub fn white_test(x: &[f64], y: &[f64]) -> HydroResult<HeteroscedasticityTest> {
    validate_equal_length(x, y)?;
    let (_, _, residuals) = simple_linear_regression(x, y)?;
    let squared: Vec<f64> = residuals.iter().map(|r| r * r).collect();

    let x_squared: Vec<f64> = x.iter().map(|v| v * v).collect();
    let fit = ols_fit(&[x.to_vec(), x_squared], &squared)?;
    let r_squared = r_squared_from_residuals(&fit.residuals, &squared)?;
    let statistic = x.len() as f64 * r_squared;
    let df = 2;
    Ok(HeteroscedasticityTest {
        statistic,
        df,
        p_value: (1.0 - chi_squared_cdf(statistic, df)?).clamp(0.0, 1.0),
    })
}

/// Goldfeld-Quandt heteroscedasticity test.
///
/// Orders the sample by the regressor, splits it into halves (dropping
/// the middle observation of an odd sample), fits each half separately,
/// and forms the ratio of residual mean squares with the larger last-half
/// variance convention. Significance is reported through the same
/// approximate chi-square CDF as the LM tests (numerator df times the
/// ratio), not an exact F distribution.
pub fn goldfeld_quandt(x: &[f64], y: &[f64]) -> HydroResult<HeteroscedasticityTest> {
    validate_equal_length(x, y)?;
    let n = x.len();
    if n < 10 {
        return Err(HydroStatsError::InsufficientData {
            required: 10,
            actual: n,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| float_total_cmp(&x[i], &x[j]));

    let half = n / 2;
    let first: Vec<usize> = order[..half].to_vec();
    let second: Vec<usize> = order[n - half..].to_vec();

    let rss_of = |indices: &[usize]| -> HydroResult<f64> {
        let xs: Vec<f64> = indices.iter().map(|&i| x[i]).collect();
        let ys: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let (_, _, residuals) = simple_linear_regression(&xs, &ys)?;
        Ok(residuals.iter().map(|r| r * r).sum())
    };

    let df_half = half - 2;
    let rss_first = rss_of(&first)?;
    let rss_second = rss_of(&second)?;
    if rss_first <= 0.0 || rss_second <= 0.0 {
        return Err(HydroStatsError::NumericalError {
            reason: "Zero residual sum of squares in a subsample".to_string(),
            operation: Some("goldfeld_quandt".to_string()),
        });
    }

    let statistic = (rss_second / df_half as f64) / (rss_first / df_half as f64);
    let scaled = statistic * df_half as f64;
    Ok(HeteroscedasticityTest {
        statistic,
        df: df_half,
        p_value: (1.0 - chi_squared_cdf(scaled, df_half)?).clamp(0.0, 1.0),
    })
}
