//! Integration tests for the error surface
//!
//! Every invalid input should come back as a typed error, never as NaN or
//! a panic. These tests pin the variant chosen for each failure class so
//! callers can match on it.

use hydro_stats::{
    anova_one_way, autocorrelation, bootstrap, chi_squared_cdf, covariance, difference,
    exponential_pdf, gamma, gev_pdf, invert, ks_test, mann_kendall, markov_chain_monte_carlo,
    mean, multivariate_regression, normal_pdf, normal_quantile, ols_fit, quantile, random_walk,
    sample_variance, simple_linear_regression, skewness, std_dev, BootstrapConfig,
    BootstrapStatistic, HydroStatsError,
};

#[test]
fn empty_and_short_inputs_report_insufficient_data() {
    assert!(matches!(
        mean(&[]),
        Err(HydroStatsError::InsufficientData { required: 1, actual: 0 })
    ));
    assert!(matches!(
        sample_variance(&[1.0]),
        Err(HydroStatsError::InsufficientData { .. })
    ));
    assert!(matches!(
        skewness(&[1.0, 2.0]),
        Err(HydroStatsError::InsufficientData { .. })
    ));
    assert!(matches!(
        mann_kendall(&[1.0, 2.0], 0.05),
        Err(HydroStatsError::InsufficientData { .. })
    ));
    assert!(matches!(
        std_dev(&[]),
        Err(HydroStatsError::InsufficientData { .. })
    ));
}

#[test]
fn mismatched_series_report_length_mismatch() {
    let a = vec![1.0, 2.0, 3.0];
    let b = vec![1.0, 2.0];
    assert!(matches!(
        covariance(&a, &b),
        Err(HydroStatsError::LengthMismatch { expected: 3, actual: 2 })
    ));
    assert!(matches!(
        simple_linear_regression(&a, &b),
        Err(HydroStatsError::LengthMismatch { .. })
    ));
}

#[test]
fn out_of_range_parameters_report_invalid_parameter() {
    let data = vec![1.0, 2.0, 3.0, 4.0];
    assert!(matches!(
        quantile(&data, 1.5),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        ks_test(&data, &data, -0.1),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        normal_pdf(0.0, 0.0, -1.0),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        exponential_pdf(1.0, 0.0),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        normal_quantile(0.0),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        difference(&data, 0),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    assert!(matches!(
        random_walk(10, 0.0, -1.0, None),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    // GEV support violation: xi > 0 with x below mu - sigma/xi.
    assert!(gev_pdf(-100.0, 0.0, 1.0, 0.5).unwrap() == 0.0);
}

#[test]
fn degenerate_numerics_report_numerical_error() {
    let constant = vec![5.0, 5.0, 5.0, 5.0];
    assert!(matches!(
        autocorrelation(&constant, 1),
        Err(HydroStatsError::NumericalError { .. })
    ));
    // Gamma pole at zero and negative integers.
    assert!(matches!(gamma(0.0), Err(HydroStatsError::InvalidParameter { .. })));
    assert!(matches!(gamma(-3.0), Err(HydroStatsError::InvalidParameter { .. })));
    // Chi-square with zero degrees of freedom is undefined.
    assert!(chi_squared_cdf(1.0, 0).is_err());
}

#[test]
fn singular_systems_report_singular_matrix() {
    let singular = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
    assert!(matches!(
        invert(&singular),
        Err(HydroStatsError::SingularMatrix { .. })
    ));

    // Perfectly collinear regressors make X'X singular.
    let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
    let y = vec![1.1, 2.0, 2.9, 4.2, 5.0];
    assert!(matches!(
        ols_fit(&[x1.clone(), x2.clone()], &y),
        Err(HydroStatsError::SingularMatrix { .. })
    ));
    assert!(matches!(
        multivariate_regression(&[x1, x2], &[y]),
        Err(HydroStatsError::SingularMatrix { .. })
    ));
}

#[test]
fn ragged_matrices_report_dimension_error() {
    let ragged = vec![vec![1.0, 2.0], vec![3.0]];
    assert!(matches!(
        invert(&ragged),
        Err(HydroStatsError::DimensionError { .. })
    ));
    assert!(matches!(
        markov_chain_monte_carlo(&ragged, 0, 5, None),
        Err(HydroStatsError::DimensionError { .. })
    ));
    // Non-square transition matrix.
    let rect = vec![vec![0.5, 0.5, 0.0]];
    assert!(matches!(
        markov_chain_monte_carlo(&rect, 0, 5, None),
        Err(HydroStatsError::DimensionError { .. })
    ));
}

#[test]
fn invalid_groupings_and_configs_are_rejected() {
    // ANOVA needs at least two groups, each with at least two values.
    assert!(anova_one_way(&[vec![1.0, 2.0]]).is_err());
    assert!(anova_one_way(&[vec![1.0, 2.0], vec![3.0]]).is_err());

    let data = vec![1.0, 2.0, 3.0, 4.0];
    let bad_alpha = BootstrapConfig {
        alpha: 0.0,
        ..Default::default()
    };
    assert!(matches!(
        bootstrap(&data, BootstrapStatistic::Mean, &bad_alpha),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
    let bad_iterations = BootstrapConfig {
        iterations: 0,
        ..Default::default()
    };
    assert!(bootstrap(&data, BootstrapStatistic::StdDev, &bad_iterations).is_err());

    // MCMC rows must be stochastic.
    let not_stochastic = vec![vec![0.7, 0.7], vec![0.5, 0.5]];
    assert!(matches!(
        markov_chain_monte_carlo(&not_stochastic, 0, 3, Some(1)),
        Err(HydroStatsError::InvalidParameter { .. })
    ));
}

#[test]
fn error_messages_are_descriptive() {
    let message = mean(&[]).unwrap_err().to_string();
    assert!(message.contains("Insufficient data"), "got: {}", message);

    let message = invert(&[vec![0.0]]).unwrap_err().to_string();
    assert!(message.to_lowercase().contains("singular"), "got: {}", message);
}
