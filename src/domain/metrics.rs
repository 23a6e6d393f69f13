//! Performance metrics derived from a finished backtest.

use super::position::ClosedTrade;
use super::stats::{calculate_returns, mean, standard_deviation};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown: f64,
    pub win_count: usize,
    /// Trades with pnl <= 0, breakeven included.
    pub loss_count: usize,
    pub avg_holding_period: f64,
    pub avg_win: f64,
    /// Mean losing pnl, signed (zero or negative).
    pub avg_loss: f64,
}

impl PerformanceMetrics {
    pub fn compute(values: &[f64], trades: &[ClosedTrade], initial_capital: f64) -> Self {
        let mut metrics = PerformanceMetrics::default();

        if let Some(&final_value) = values.last() {
            metrics.total_return = if initial_capital > 0.0 {
                final_value / initial_capital - 1.0
            } else {
                0.0
            };

            let years = values.len() as f64 / TRADING_DAYS_PER_YEAR;
            let growth = 1.0 + metrics.total_return;
            metrics.annualized_return = if growth > 0.0 {
                growth.powf(1.0 / years) - 1.0
            } else {
                -1.0
            };

            metrics.sharpe_ratio = compute_sharpe(values);
            metrics.max_drawdown = compute_max_drawdown(values);
        }

        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut total_holding = 0usize;

        for trade in trades {
            if trade.is_win() {
                metrics.win_count += 1;
                total_wins += trade.pnl;
            } else {
                metrics.loss_count += 1;
                total_losses += trade.pnl;
            }
            total_holding += trade.holding_period();
        }

        if !trades.is_empty() {
            metrics.avg_holding_period = total_holding as f64 / trades.len() as f64;
        }
        if metrics.win_count > 0 {
            metrics.avg_win = total_wins / metrics.win_count as f64;
        }
        if metrics.loss_count > 0 {
            metrics.avg_loss = total_losses / metrics.loss_count as f64;
        }

        metrics
    }

    pub fn total_trades(&self) -> usize {
        self.win_count + self.loss_count
    }

    pub fn win_rate(&self) -> f64 {
        match self.total_trades() {
            0 => 0.0,
            n => self.win_count as f64 / n as f64,
        }
    }
}

/// Annualized mean/std of daily returns, 0% risk-free rate.
fn compute_sharpe(values: &[f64]) -> f64 {
    let returns = calculate_returns(values);
    let sd = standard_deviation(&returns);
    if !(sd > 0.0) {
        return 0.0;
    }

    let sharpe = mean(&returns) / sd * TRADING_DAYS_PER_YEAR.sqrt();
    if sharpe.is_finite() { sharpe } else { 0.0 }
}

/// Largest peak-to-trough decline as a fraction of the peak, in [0, 1].
fn compute_max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in values {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd.min(1.0)
}
