//! Simplified Dickey-Fuller stationarity test.
//!
//! Regresses the first difference on the one-step lagged level:
//! dY[t] = a + b * Y[t-1] + e[t]
//! t = b / (sqrt(SSR / (m - 2)) / sqrt(sum(Y[t-1]^2)))
//!
//! This is a single-lag approximation with fixed critical values. The p-value
//! is a coarse bucket, not an interpolated MacKinnon p-value.

use super::linear_regression;

/// Minimum observations before the test is attempted.
pub const MIN_OBSERVATIONS: usize = 20;

pub const CRITICAL_VALUE_1PCT: f64 = -3.43;
pub const CRITICAL_VALUE_5PCT: f64 = -2.86;
pub const CRITICAL_VALUE_10PCT: f64 = -2.57;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    pub test_statistic: f64,
    pub p_value: f64,
    pub is_stationary: bool,
}

impl AdfResult {
    pub fn non_stationary() -> Self {
        AdfResult {
            test_statistic: 0.0,
            p_value: 1.0,
            is_stationary: false,
        }
    }

    fn from_statistic(test_statistic: f64) -> Self {
        let p_value = if test_statistic < CRITICAL_VALUE_1PCT {
            0.01
        } else if test_statistic < CRITICAL_VALUE_5PCT {
            0.05
        } else if test_statistic < CRITICAL_VALUE_10PCT {
            0.10
        } else {
            1.0
        };

        AdfResult {
            test_statistic,
            p_value,
            is_stationary: test_statistic < CRITICAL_VALUE_5PCT,
        }
    }
}

/// `max_lags` is accepted for interface compatibility; only one lag is used.
pub fn adf_test(series: &[f64], max_lags: usize) -> AdfResult {
    if series.len() < MIN_OBSERVATIONS {
        return AdfResult::non_stationary();
    }
    if max_lags > 1 {
        tracing::debug!(max_lags, "adf_test uses a single lag; extra lags ignored");
    }

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let lagged = &series[..series.len() - 1];

    let regression = linear_regression(lagged, &diff);
    if regression.is_degenerate() {
        return AdfResult::non_stationary();
    }

    let m = regression.residuals.len() as f64;
    let residual_se = (regression.ssr() / (m - 2.0)).sqrt();
    let lagged_norm = lagged.iter().map(|v| v * v).sum::<f64>().sqrt();
    let se = residual_se / lagged_norm;

    if !(se > 0.0 && se.is_finite()) {
        return AdfResult::non_stationary();
    }

    let test_statistic = regression.beta / se;
    if !test_statistic.is_finite() {
        return AdfResult::non_stationary();
    }

    AdfResult::from_statistic(test_statistic)
}
