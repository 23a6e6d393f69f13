//! Wide-format CSV market data adapter.
//!
//! Layout: `Date,SYM1,SYM2,...`, one row per trading day. Dates are kept as
//! the literal cell text.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::error::StatArbError;
use crate::ports::price_port::PricePort;

#[derive(Debug, Clone, Default)]
pub struct CsvMarketData {
    dates: Vec<String>,
    symbols: Vec<String>,
    prices: HashMap<String, Vec<f64>>,
}

impl CsvMarketData {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StatArbError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| StatArbError::DataLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let data = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            days = data.dates.len(),
            symbols = data.symbols.len(),
            "loaded market data"
        );
        Ok(data)
    }

    /// Short rows and unparseable cells load as NaN.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StatArbError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| StatArbError::InvalidData {
            reason: format!("CSV header error: {e}"),
        })?;
        if headers.len() < 2 {
            return Err(StatArbError::InvalidData {
                reason: "header needs a date column and at least one symbol".into(),
            });
        }

        let symbols: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); symbols.len()];
        let mut dates = Vec::new();
        let mut bad_cells = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| StatArbError::InvalidData {
                reason: format!("CSV parse error: {e}"),
            })?;
            let Some(date) = record.get(0) else {
                continue;
            };
            dates.push(date.to_string());

            for (i, column) in columns.iter_mut().enumerate() {
                let value = match record.get(i + 1).map(str::parse::<f64>) {
                    Some(Ok(v)) => v,
                    _ => {
                        bad_cells += 1;
                        f64::NAN
                    }
                };
                column.push(value);
            }
        }

        if bad_cells > 0 {
            tracing::warn!(bad_cells, "missing or unparseable price cells loaded as NaN");
        }

        let prices = symbols.iter().cloned().zip(columns).collect();
        Ok(CsvMarketData {
            dates,
            symbols,
            prices,
        })
    }
}

impl PricePort for CsvMarketData {
    fn price_series(&self, symbol: &str) -> Option<&[f64]> {
        self.prices.get(symbol).map(Vec::as_slice)
    }

    fn data_size(&self) -> usize {
        self.dates.len()
    }

    fn available_symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }

    fn dates(&self) -> &[String] {
        &self.dates
    }
}
