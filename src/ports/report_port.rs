//! Result export port.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StatArbError;

/// Port for persisting a finished backtest.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), StatArbError>;
}
