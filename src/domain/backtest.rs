//! Multi-pair backtest engine.
//!
//! Each accepted pair is replayed day by day against one shared portfolio.
//! Pairs run in the order they were added; cash carries over between pairs
//! and a later pair overwrites the value of every day it touches.

use super::error::StatArbError;
use super::metrics::PerformanceMetrics;
use super::pair::AssetPair;
use super::portfolio::{PairId, Portfolio};
use super::position::{ClosedTrade, Direction, PairPosition};
use super::signal::Signal;
use crate::ports::price_port::PricePort;

/// Significance level used when screening pairs.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Share of portfolio value committed to each new position.
pub const POSITION_FRACTION: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub entry_threshold: f64,
    pub exit_threshold: f64,
    pub lookback_window: usize,
    /// Fill at the next day's prices (T+1) instead of the signal day's.
    pub delayed_execution: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 1_000_000.0,
            entry_threshold: 1.5,
            exit_threshold: 0.0,
            lookback_window: 20,
            delayed_execution: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub portfolio_values: Vec<f64>,
    pub trades: Vec<ClosedTrade>,
    pub metrics: PerformanceMetrics,
    /// Positions still open after the last day, keyed by pair label.
    pub open_positions: Vec<(String, PairPosition)>,
    pub pair_count: usize,
}

pub struct Backtester<'a> {
    market: &'a dyn PricePort,
    pairs: Vec<AssetPair>,
    portfolio: Portfolio,
    metrics: PerformanceMetrics,
}

impl<'a> Backtester<'a> {
    pub fn new(market: &'a dyn PricePort) -> Self {
        Backtester {
            market,
            pairs: Vec::new(),
            portfolio: Portfolio::new(0.0, 0),
            metrics: PerformanceMetrics::default(),
        }
    }

    /// Screen `symbol_a`/`symbol_b` for cointegration and keep the pair if it
    /// passes. Unknown symbols are rejected with a warning.
    pub fn add_pair(&mut self, symbol_a: &str, symbol_b: &str) -> bool {
        let (Some(prices_a), Some(prices_b)) = (
            self.market.price_series(symbol_a),
            self.market.price_series(symbol_b),
        ) else {
            tracing::warn!(symbol_a, symbol_b, "price data not found for pair");
            return false;
        };

        let mut pair = AssetPair::new(symbol_a, symbol_b, prices_a.to_vec(), prices_b.to_vec());
        if !pair.test_cointegration(SIGNIFICANCE_LEVEL) {
            tracing::info!(pair = %pair.label(), "pair is not cointegrated, skipping");
            return false;
        }

        tracing::info!(pair = %pair.label(), beta = pair.beta(), "added cointegrated pair");
        self.pairs.push(pair);
        true
    }

    pub fn run_backtest(&mut self, config: &BacktestConfig) -> Result<BacktestResult, StatArbError> {
        let num_days = self.market.data_size();
        if num_days == 0 {
            return Err(StatArbError::NoMarketData);
        }

        self.portfolio = Portfolio::new(config.initial_capital, num_days);
        self.metrics = PerformanceMetrics::default();

        for (pair_id, pair) in self.pairs.iter().enumerate() {
            simulate_pair(pair_id, pair, &mut self.portfolio, self.market, config);
        }

        self.metrics = PerformanceMetrics::compute(
            &self.portfolio.values,
            &self.portfolio.closed_trades,
            config.initial_capital,
        );

        tracing::info!(
            pairs = self.pairs.len(),
            trades = self.portfolio.closed_trades.len(),
            total_return = self.metrics.total_return,
            "backtest complete"
        );

        let open_positions = self
            .pairs
            .iter()
            .enumerate()
            .filter_map(|(id, pair)| {
                let pos = self.portfolio.get_position(id)?;
                Some((pair.label(), pos.clone()))
            })
            .collect();

        Ok(BacktestResult {
            portfolio_values: self.portfolio.values.clone(),
            trades: self.portfolio.closed_trades.clone(),
            metrics: self.metrics.clone(),
            open_positions,
            pair_count: self.pairs.len(),
        })
    }

    /// Cash plus open positions at the provider's prices for `day`.
    pub fn calculate_portfolio_value(&self, day: usize) -> f64 {
        self.portfolio.mark_to_market(self.market, Some(day))
    }

    pub fn pairs(&self) -> &[AssetPair] {
        &self.pairs
    }

    pub fn portfolio_values(&self) -> &[f64] {
        &self.portfolio.values
    }

    pub fn trade_history(&self) -> &[ClosedTrade] {
        &self.portfolio.closed_trades
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }
}

/// Replay one pair's signals against the shared portfolio.
///
/// The held signal is the pair's position state: it only changes on a day
/// whose execution prices are both defined.
fn simulate_pair(
    pair_id: PairId,
    pair: &AssetPair,
    portfolio: &mut Portfolio,
    market: &dyn PricePort,
    config: &BacktestConfig,
) {
    let signals = pair.generate_signals(
        config.entry_threshold,
        config.exit_threshold,
        config.lookback_window,
    );
    let last_day = signals.len().min(market.data_size());
    let mut held = Signal::Flat;

    for day in config.lookback_window..last_day {
        let exec_day = if config.delayed_execution && day + 1 < last_day {
            day + 1
        } else {
            day
        };
        let signal = signals[day];

        if signal != held {
            let price_a = pair.prices_a()[exec_day];
            let price_b = pair.prices_b()[exec_day];

            if price_a.is_finite() && price_b.is_finite() {
                if let Some(trade) = portfolio.close_position(pair_id, price_a, price_b, exec_day) {
                    tracing::debug!(
                        pair = %pair.label(),
                        day = exec_day,
                        pnl = trade.pnl,
                        "closed position"
                    );
                }

                if let Some(direction) = Direction::from_signal(signal) {
                    let notional =
                        POSITION_FRACTION * portfolio.mark_to_market(market, exec_day.checked_sub(1));
                    let position = PairPosition::open(
                        pair.symbol_a(),
                        pair.symbol_b(),
                        direction,
                        notional,
                        price_a,
                        price_b,
                        exec_day,
                    );
                    tracing::debug!(
                        pair = %pair.label(),
                        day = exec_day,
                        ?direction,
                        notional,
                        "opened position"
                    );
                    portfolio.open_position(pair_id, position);
                }

                held = signal;
            } else {
                tracing::debug!(pair = %pair.label(), day = exec_day, "missing price, holding");
            }
        }

        let value = portfolio.mark_to_market(market, Some(exec_day));
        portfolio.record_value(exec_day, value);
    }
}
