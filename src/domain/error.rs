//! Domain error types.
//!
//! Only resource and configuration failures surface as errors. Numerical
//! degeneracy is handled inside [`crate::domain::stats`] with sentinel values.

/// Top-level error type for statarb.
#[derive(Debug, thiserror::Error)]
pub enum StatArbError {
    #[error("failed to load market data from {path}: {reason}")]
    DataLoad { path: String, reason: String },

    #[error("invalid market data: {reason}")]
    InvalidData { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no market data available")]
    NoMarketData,

    #[error("need at least 2 symbols for pairs trading, found {found}")]
    InsufficientSymbols { found: usize },

    #[error("failed to write results to {path}: {reason}")]
    ReportWrite { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StatArbError {
    pub(crate) fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        StatArbError::ConfigInvalid {
            section: "backtest".to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&StatArbError> for std::process::ExitCode {
    fn from(err: &StatArbError) -> Self {
        let code: u8 = match err {
            StatArbError::Io(_)
            | StatArbError::DataLoad { .. }
            | StatArbError::InvalidData { .. } => 1,
            StatArbError::ConfigParse { .. } | StatArbError::ConfigInvalid { .. } => 2,
            StatArbError::NoMarketData | StatArbError::InsufficientSymbols { .. } => 5,
            StatArbError::ReportWrite { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
