//! CSV result exporter implementing ReportPort.
//!
//! Writes the daily portfolio value series as `Day,PortfolioValue`.

use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::StatArbError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    fn write_csv(result: &BacktestResult, output_path: &Path) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_path(output_path)?;
        wtr.write_record(["Day", "PortfolioValue"])?;
        for (day, value) in result.portfolio_values.iter().enumerate() {
            wtr.write_record([day.to_string(), value.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), StatArbError> {
        Self::write_csv(result, output_path).map_err(|e| StatArbError::ReportWrite {
            path: output_path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::info!(
            path = %output_path.display(),
            rows = result.portfolio_values.len(),
            "results exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::PerformanceMetrics;
    use tempfile::TempDir;

    fn sample_result() -> BacktestResult {
        BacktestResult {
            portfolio_values: vec![100_000.0, 100_250.5, 99_800.0],
            trades: Vec::new(),
            metrics: PerformanceMetrics::default(),
            open_positions: Vec::new(),
            pair_count: 0,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");
        CsvReportAdapter::new().write(&sample_result(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec!["Day,PortfolioValue", "0,100000", "1,100250.5", "2,99800"]
        );
    }

    #[test]
    fn empty_series_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        let result = BacktestResult {
            portfolio_values: Vec::new(),
            ..sample_result()
        };
        CsvReportAdapter::new().write(&result, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["Day,PortfolioValue"]);
    }

    #[test]
    fn unwritable_path_is_report_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.csv");
        let err = CsvReportAdapter::new()
            .write(&sample_result(), &path)
            .unwrap_err();
        assert!(matches!(err, StatArbError::ReportWrite { .. }));
    }
}
