//! Statistics over ordered numeric sequences.
//!
//! Every function here is total: degenerate inputs produce NaN, zero, or a
//! degenerate result struct rather than an error.
//! - [`rolling`]: trailing-window mean, standard deviation and z-score
//! - [`regression`]: ordinary least squares via the normal equations
//! - [`adf`]: simplified single-lag stationarity test

pub mod adf;
pub mod regression;
pub mod rolling;

pub use adf::{adf_test, AdfResult};
pub use regression::{linear_regression, RegressionResult};
pub use rolling::{
    rolling_mean, rolling_std_dev, rolling_z_score, rolling_z_score_scaled, NEAR_ZERO_STD,
};

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n - 1 divisor). NaN with fewer than 2 points.
pub fn standard_deviation(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return f64::NAN;
    }

    let avg = mean(data);
    let sum_squared_diff: f64 = data
        .iter()
        .map(|v| {
            let diff = v - avg;
            diff * diff
        })
        .sum();

    (sum_squared_diff / (data.len() - 1) as f64).sqrt()
}

/// Simple returns `p[i] / p[i-1] - 1`. Empty with fewer than 2 prices.
pub fn calculate_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}
