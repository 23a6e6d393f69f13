//! Price provider port.
//!
//! Implementations hold every series aligned to one date index; the core
//! never realigns by date.

pub trait PricePort {
    /// Full price series for `symbol`, or `None` if the symbol is unknown.
    /// An empty slice is a known symbol with no observations.
    fn price_series(&self, symbol: &str) -> Option<&[f64]>;

    /// Number of trading days in the dataset.
    fn data_size(&self) -> usize;

    /// Known symbols in a stable order.
    fn available_symbols(&self) -> Vec<String>;

    fn dates(&self) -> &[String];

    fn price_at(&self, symbol: &str, day: usize) -> Option<f64> {
        self.price_series(symbol)?.get(day).copied()
    }
}
