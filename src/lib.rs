//! # Hydrological Statistics
//!
//! Statistical analysis toolkit for hydrological and environmental time series.
//!
//! This crate provides the building blocks of a hydrological analysis
//! pipeline: descriptive statistics with gap and outlier handling,
//! probability distributions for extreme-value work, hypothesis tests for
//! trend and distributional questions, regression on dense matrices,
//! time-series diagnostics, and seedable resampling. Every routine returns
//! a typed error on invalid input instead of propagating NaN.
//!
//! ## Key Features
//!
//! - **Descriptive Statistics**: Moments, quantiles, correlation, plus
//!   IQR/z-score outlier filters and gap detection and filling
//! - **Distributions**: Continuous densities (normal, lognormal, gamma,
//!   Gumbel, GEV, Weibull, ...) and discrete mass functions built on an
//!   in-house special-function layer
//! - **Hypothesis Tests**: Mann-Kendall trend, Kolmogorov-Smirnov,
//!   t/F/ANOVA, rank tests, normality tests, heteroscedasticity tests
//! - **Regression**: OLS via explicit normal equations with singularity
//!   detection, simple and multivariate interfaces
//! - **Diagnostics**: ACF, PACF (Durbin-Levinson), differencing, moving
//!   averages
//! - **Resampling**: Bootstrap confidence intervals, Monte Carlo drivers,
//!   Markov-chain simulation and random walks, all reproducible via seeds
//!
//! ## Quick Start
//!
//! ```rust
//! use hydro_stats::{
//!     bootstrap, mann_kendall, mean, std_dev, BootstrapConfig, BootstrapStatistic,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Annual peak flows, cubic meters per second.
//!     let flows = vec![
//!         312.0, 287.5, 455.2, 390.1, 512.8, 298.4, 601.3, 488.0, 529.7, 575.1,
//!         344.9, 620.5, 410.2, 655.8, 702.4, 580.3, 691.0, 540.6, 730.2, 684.5,
//!     ];
//!
//!     println!("mean flow: {:.1}", mean(&flows)?);
//!     println!("std dev:   {:.1}", std_dev(&flows)?);
//!
//!     // Is there a monotonic trend at the 5% level?
//!     let trend = mann_kendall(&flows, 0.05)?;
//!     println!("trend: {:?} (p = {:.4})", trend.trend, trend.p_value);
//!
//!     // Bootstrap confidence interval for the mean, reproducibly.
//!     let config = BootstrapConfig {
//!         seed: Some(42),
//!         ..Default::default()
//!     };
//!     let summary = bootstrap(&flows, BootstrapStatistic::Mean, &config)?;
//!     println!(
//!         "95% CI: [{:.1}, {:.1}]",
//!         summary.confidence_interval.0, summary.confidence_interval.1
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod descriptive;
pub mod errors;
pub mod matrix;
pub mod rng;
pub mod special;

// Analysis methods
pub mod diagnostics;
pub mod distributions;
pub mod efficiency;
pub mod hypothesis;
pub mod resampling;

// Re-exports for convenience - main public API
pub use errors::{HydroResult, HydroStatsError};

// Descriptive statistics and cleaning exports
pub use descriptive::{
    coefficient_of_variation, covariance, fill_gaps, find_gaps, geometric_mean,
    iqr_outlier_bounds, iqr_outlier_filter, kurtosis, max_value, mean, median, min_value,
    pearson_correlation, quantile, range, remove_gaps, sample_variance, skewness, std_dev, sum,
    variance, zscore_outlier_filter, FillMethod,
};

// Special-function exports
pub use special::{
    chi_squared_cdf, erf, gamma, ln_gamma, lower_incomplete_gamma_regularized, normal_cdf,
    normal_cdf_many, normal_quantile,
};

// Distribution exports
pub use distributions::{
    bernoulli_pmf, beta_pdf, binomial_pmf, exponential_pdf, gamma_pdf, geometric_pmf, gev_pdf,
    gumbel_pdf, lognormal_pdf, logseries_pmf, multinomial_pmf, normal_pdf, poisson_pmf,
    poisson_process_counts, poisson_process_times, uniform_pdf, weibull_pdf,
};

// Hypothesis test exports
pub use hypothesis::{
    anderson_darling, anova_one_way, breusch_pagan, f_test, goldfeld_quandt, ks_test,
    mann_kendall, mann_whitney_u, shapiro_wilk, t_test_one_sample, t_test_paired,
    t_test_two_sample, white_test, wilcoxon_signed_rank, AndersonDarlingTest, Anova, FTest,
    HeteroscedasticityTest, KsTest, MannKendallTest, MannWhitneyTest, ShapiroWilkTest, TTest,
    TrendDirection, WilcoxonTest,
};

// Regression and linear-algebra exports
pub use matrix::{
    invert, multiply, multivariate_regression, ols_fit, simple_linear_regression, transpose,
    OlsFit,
};

// Time-series diagnostic exports
pub use diagnostics::{
    autocorrelation, cumulative_sum, difference, exponential_moving_average,
    linear_moving_average, partial_autocorrelation, simple_moving_average,
};

// Resampling and simulation exports
pub use resampling::{
    bootstrap, markov_chain_monte_carlo, monte_carlo, monte_carlo_normal, random_walk,
    BootstrapConfig, BootstrapStatistic, BootstrapSummary,
};

// Model-efficiency exports
pub use efficiency::{
    index_of_agreement, mae, mape, model_efficiency, nse, r_squared, rmse, EfficiencyMetric,
};

// Randomness exports
pub use rng::{clear_global_seed, global_seed, mix_seed, set_global_seed, StatsRng};
