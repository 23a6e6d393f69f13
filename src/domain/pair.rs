//! Asset pair, spread, and cointegration test.
//!
//! spread[i] = A[i] - beta * B[i], with beta = 1.0 until the pair is tested
//! and the OLS slope of A on B afterwards.

use super::signal::{generate_signals, Signal, SignalThresholds};
use super::stats::{adf_test, linear_regression, rolling_z_score_scaled};

/// R^2 this close to 1 means B explains A exactly and the spread is constant.
const EXACT_FIT_TOLERANCE: f64 = 1e-10;

const DEFAULT_SIGNIFICANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CointegrationState {
    #[default]
    Untested,
    Tested { cointegrated: bool },
}

#[derive(Debug, Clone)]
pub struct AssetPair {
    symbol_a: String,
    symbol_b: String,
    prices_a: Vec<f64>,
    prices_b: Vec<f64>,
    spreads: Vec<f64>,
    beta: f64,
    state: CointegrationState,
}

impl AssetPair {
    /// Series of unequal length are truncated to the shorter one, keeping the
    /// earliest observations.
    pub fn new(
        symbol_a: impl Into<String>,
        symbol_b: impl Into<String>,
        mut prices_a: Vec<f64>,
        mut prices_b: Vec<f64>,
    ) -> Self {
        let symbol_a = symbol_a.into();
        let symbol_b = symbol_b.into();

        if prices_a.len() != prices_b.len() {
            let min_len = prices_a.len().min(prices_b.len());
            tracing::warn!(
                %symbol_a,
                %symbol_b,
                len_a = prices_a.len(),
                len_b = prices_b.len(),
                "price series have different lengths, truncating to {min_len}"
            );
            prices_a.truncate(min_len);
            prices_b.truncate(min_len);
        }

        let mut pair = AssetPair {
            symbol_a,
            symbol_b,
            prices_a,
            prices_b,
            spreads: Vec::new(),
            beta: 1.0,
            state: CointegrationState::Untested,
        };
        pair.calculate_spreads();
        pair
    }

    pub fn symbol_a(&self) -> &str {
        &self.symbol_a
    }

    pub fn symbol_b(&self) -> &str {
        &self.symbol_b
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.symbol_a, self.symbol_b)
    }

    pub fn prices_a(&self) -> &[f64] {
        &self.prices_a
    }

    pub fn prices_b(&self) -> &[f64] {
        &self.prices_b
    }

    pub fn len(&self) -> usize {
        self.prices_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices_a.is_empty()
    }

    pub fn spreads(&self) -> &[f64] {
        &self.spreads
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn state(&self) -> CointegrationState {
        self.state
    }

    pub fn is_cointegrated(&self) -> bool {
        matches!(self.state, CointegrationState::Tested { cointegrated: true })
    }

    fn calculate_spreads(&mut self) {
        self.spreads = self
            .prices_a
            .iter()
            .zip(&self.prices_b)
            .map(|(a, b)| a - self.beta * b)
            .collect();
    }

    /// Engle-Granger style test: regress A on B, then test the spread for
    /// stationarity.
    ///
    /// `significance_level` does not move the critical value, which is fixed
    /// at the 5% level. Re-running on the same data gives the same beta.
    pub fn test_cointegration(&mut self, significance_level: f64) -> bool {
        if significance_level != DEFAULT_SIGNIFICANCE {
            tracing::debug!(
                pair = %self.label(),
                significance_level,
                "critical value is fixed at the 5% level"
            );
        }

        let regression = linear_regression(&self.prices_b, &self.prices_a);
        self.beta = regression.beta;
        self.calculate_spreads();

        let adf = adf_test(&self.spreads, 1);
        let exact_fit = !regression.is_degenerate()
            && regression.r_squared >= 1.0 - EXACT_FIT_TOLERANCE;
        let cointegrated = adf.is_stationary || exact_fit;

        tracing::debug!(
            pair = %self.label(),
            beta = self.beta,
            r_squared = regression.r_squared,
            adf_statistic = adf.test_statistic,
            exact_fit,
            cointegrated,
            "cointegration test"
        );

        self.state = CointegrationState::Tested { cointegrated };
        cointegrated
    }

    /// Rolling z-score of the spread. A window at least as long as the spread
    /// is shrunk to half the spread length, but never below 2.
    ///
    /// Deviations that are rounding noise relative to the A price level give
    /// NaN, so an exact-fit pair never produces a tradeable z-score.
    pub fn z_scores(&self, window: usize) -> Vec<f64> {
        let window = if window >= self.spreads.len() {
            (self.spreads.len() / 2).max(2)
        } else {
            window
        };
        let price_level = self
            .prices_a
            .iter()
            .filter(|p| p.is_finite())
            .fold(0.0f64, |acc, p| acc.max(p.abs()));
        rolling_z_score_scaled(&self.spreads, window, price_level)
    }

    pub fn generate_signals(
        &self,
        entry_threshold: f64,
        exit_threshold: f64,
        lookback_window: usize,
    ) -> Vec<Signal> {
        let thresholds = SignalThresholds {
            entry: entry_threshold,
            exit: exit_threshold,
        };
        generate_signals(&self.z_scores(lookback_window), thresholds)
    }
}
