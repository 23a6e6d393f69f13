#![allow(dead_code)]

use statarb::ports::price_port::PricePort;
use std::collections::HashMap;
use std::io::Write;

/// In-memory price provider; symbols keep insertion order.
pub struct MockPricePort {
    pub series: HashMap<String, Vec<f64>>,
    pub order: Vec<String>,
    pub dates: Vec<String>,
}

impl MockPricePort {
    pub fn new(days: usize) -> Self {
        Self {
            series: HashMap::new(),
            order: Vec::new(),
            dates: (0..days).map(|d| format!("day-{d}")).collect(),
        }
    }

    pub fn with_series(mut self, symbol: &str, prices: Vec<f64>) -> Self {
        self.order.push(symbol.to_string());
        self.series.insert(symbol.to_string(), prices);
        self
    }
}

impl PricePort for MockPricePort {
    fn price_series(&self, symbol: &str) -> Option<&[f64]> {
        self.series.get(symbol).map(|v| v.as_slice())
    }

    fn data_size(&self) -> usize {
        self.dates.len()
    }

    fn available_symbols(&self) -> Vec<String> {
        self.order.clone()
    }

    fn dates(&self) -> &[String] {
        &self.dates
    }
}

/// Slow-trending B with A = 0.5 B plus fast mean-reverting noise.
pub fn cointegrated_ab(n: usize) -> (Vec<f64>, Vec<f64>) {
    let b: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.3 * t + 3.0 * (0.05 * t).sin()
        })
        .collect();
    let a = b
        .iter()
        .enumerate()
        .map(|(i, bv)| 0.5 * bv + 1.5 * (1.3 * i as f64).sin())
        .collect();
    (a, b)
}

/// Second cointegrated pair: D = 2 C plus noise.
pub fn cointegrated_dc(n: usize) -> (Vec<f64>, Vec<f64>) {
    let c: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            60.0 + 0.2 * t + 2.0 * (0.07 * t).cos()
        })
        .collect();
    let d = c
        .iter()
        .enumerate()
        .map(|(i, cv)| 2.0 * cv + 2.0 * (0.9 * i as f64 + 0.4).sin())
        .collect();
    (d, c)
}

pub fn cointegrated_market(n: usize) -> MockPricePort {
    let (a, b) = cointegrated_ab(n);
    let (d, c) = cointegrated_dc(n);
    MockPricePort::new(n)
        .with_series("A", a)
        .with_series("B", b)
        .with_series("C", c)
        .with_series("D", d)
}

/// 100 days, columns A1,B1,A2,B2: A1/B1 from [`cointegrated_ab`] and A2/B2
/// from [`cointegrated_dc`]. Dates run 2020-01-1 to 2020-01-100.
pub fn two_pair_csv() -> String {
    let (a1, b1) = cointegrated_ab(100);
    let (a2, b2) = cointegrated_dc(100);
    let mut out = String::from("Date,A1,B1,A2,B2\n");
    for i in 0..100 {
        out.push_str(&format!(
            "2020-01-{},{},{},{},{}\n",
            i + 1,
            a1[i],
            b1[i],
            a2[i],
            b2[i]
        ));
    }
    out
}

/// Wide CSV for the given symbols and equal-length series.
pub fn to_csv(columns: &[(&str, &[f64])]) -> String {
    let mut out = String::from("Date");
    for (name, _) in columns {
        out.push(',');
        out.push_str(name);
    }
    out.push('\n');

    let days = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
    for day in 0..days {
        out.push_str(&format!("2021-{:03}", day + 1));
        for (_, values) in columns {
            out.push_str(&format!(",{}", values[day]));
        }
        out.push('\n');
    }
    out
}

pub fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
