//! Two-legged spread positions and closed trades.

use super::signal::Signal;

/// Direction of an open spread position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Long A, short B.
    LongSpread,
    /// Short A, long B.
    ShortSpread,
}

impl Direction {
    /// `None` for a flat signal.
    pub fn from_signal(signal: Signal) -> Option<Direction> {
        match signal {
            Signal::LongSpread => Some(Direction::LongSpread),
            Signal::ShortSpread => Some(Direction::ShortSpread),
            Signal::Flat => None,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::LongSpread => 1.0,
            Direction::ShortSpread => -1.0,
        }
    }

    pub fn as_signal(self) -> Signal {
        match self {
            Direction::LongSpread => Signal::LongSpread,
            Direction::ShortSpread => Signal::ShortSpread,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairPosition {
    pub symbol_a: String,
    pub symbol_b: String,
    /// Signed; negative when short.
    pub quantity_a: f64,
    pub quantity_b: f64,
    pub entry_price_a: f64,
    pub entry_price_b: f64,
    pub entry_day: usize,
    pub direction: Direction,
}

impl PairPosition {
    /// Split `notional` evenly in dollar terms between the two legs.
    ///
    /// Long-spread: +notional/2 in A, -notional/2 in B. Short-spread mirrors it.
    pub fn open(
        symbol_a: &str,
        symbol_b: &str,
        direction: Direction,
        notional: f64,
        price_a: f64,
        price_b: f64,
        day: usize,
    ) -> Self {
        let leg_notional = notional / 2.0;
        let sign = direction.sign();
        PairPosition {
            symbol_a: symbol_a.to_string(),
            symbol_b: symbol_b.to_string(),
            quantity_a: sign * leg_notional / price_a,
            quantity_b: -sign * leg_notional / price_b,
            entry_price_a: price_a,
            entry_price_b: price_b,
            entry_day: day,
            direction,
        }
    }

    /// Signed cash needed to open: positive legs cost, negative legs credit.
    pub fn entry_value(&self) -> f64 {
        self.quantity_a * self.entry_price_a + self.quantity_b * self.entry_price_b
    }

    pub fn market_value(&self, price_a: f64, price_b: f64) -> f64 {
        self.quantity_a * price_a + self.quantity_b * price_b
    }

    pub fn unrealized_pnl(&self, price_a: f64, price_b: f64) -> f64 {
        self.market_value(price_a, price_b) - self.entry_value()
    }

    pub fn close(&self, price_a: f64, price_b: f64, day: usize) -> ClosedTrade {
        ClosedTrade {
            symbol_a: self.symbol_a.clone(),
            symbol_b: self.symbol_b.clone(),
            direction: self.direction,
            entry_day: self.entry_day,
            exit_day: day,
            pnl: self.unrealized_pnl(price_a, price_b),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub symbol_a: String,
    pub symbol_b: String,
    pub direction: Direction,
    pub entry_day: usize,
    pub exit_day: usize,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn holding_period(&self) -> usize {
        self.exit_day.saturating_sub(self.entry_day)
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
