//! Portfolio state: cash, open spread positions, daily values, trade log.

use std::collections::BTreeMap;

use super::position::{ClosedTrade, PairPosition};
use crate::ports::price_port::PricePort;

/// Identifies an accepted pair within one backtest run.
pub type PairId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: BTreeMap<PairId, PairPosition>,
    pub closed_trades: Vec<ClosedTrade>,
    /// Mark-to-market value per trading day.
    pub values: Vec<f64>,
}

impl Portfolio {
    /// Every day starts at the initial capital until a pair loop records it.
    pub fn new(initial_capital: f64, num_days: usize) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            positions: BTreeMap::new(),
            closed_trades: Vec::new(),
            values: vec![initial_capital; num_days],
        }
    }

    pub fn has_position(&self, pair_id: PairId) -> bool {
        self.positions.contains_key(&pair_id)
    }

    pub fn get_position(&self, pair_id: PairId) -> Option<&PairPosition> {
        self.positions.get(&pair_id)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Pays the position's entry value out of cash.
    pub fn open_position(&mut self, pair_id: PairId, position: PairPosition) {
        debug_assert!(
            !self.has_position(pair_id),
            "pair {pair_id} already has an open position"
        );
        self.cash -= position.entry_value();
        self.positions.insert(pair_id, position);
    }

    /// Realizes the position's exit value into cash and logs the trade.
    /// Returns `None` if the pair has nothing open.
    pub fn close_position(
        &mut self,
        pair_id: PairId,
        price_a: f64,
        price_b: f64,
        day: usize,
    ) -> Option<ClosedTrade> {
        let position = self.positions.remove(&pair_id)?;
        self.cash += position.market_value(price_a, price_b);
        let trade = position.close(price_a, price_b, day);
        self.closed_trades.push(trade.clone());
        Some(trade)
    }

    /// Cash plus every open position at the provider's prices for `day`.
    /// Out-of-range days (including `None`, i.e. before day 0) value at the
    /// initial capital. A position without a usable price that day is held
    /// at its entry value.
    pub fn mark_to_market(&self, prices: &dyn PricePort, day: Option<usize>) -> f64 {
        let day = match day {
            Some(d) if d < prices.data_size() => d,
            _ => return self.initial_capital,
        };

        let position_value: f64 = self
            .positions
            .values()
            .map(|pos| {
                match (
                    prices.price_at(&pos.symbol_a, day),
                    prices.price_at(&pos.symbol_b, day),
                ) {
                    (Some(a), Some(b)) if a.is_finite() && b.is_finite() => {
                        pos.market_value(a, b)
                    }
                    _ => pos.entry_value(),
                }
            })
            .sum();

        self.cash + position_value
    }

    /// Overwrites the value for `day`; later writers win.
    pub fn record_value(&mut self, day: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(day) {
            *slot = value;
        }
    }
}
