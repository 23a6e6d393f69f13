//! Configuration validation.
//!
//! Two passes: the INI `[backtest]` section is checked key by key before it
//! is merged, and the merged [`BacktestConfig`] is range-checked before the
//! run.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StatArbError;
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "backtest";

/// Every key present in `[backtest]` must parse and be in range. Absent keys
/// fall back to defaults and are not checked here.
pub fn validate_backtest_section(config: &dyn ConfigPort) -> Result<(), StatArbError> {
    validate_initial_capital(config)?;
    validate_thresholds(config)?;
    validate_lookback_window(config)?;
    validate_delayed_execution(config)?;
    Ok(())
}

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), StatArbError> {
    if !(config.initial_capital > 0.0) || !config.initial_capital.is_finite() {
        return Err(StatArbError::invalid_config(
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    if !config.entry_threshold.is_finite() || config.entry_threshold < 0.0 {
        return Err(StatArbError::invalid_config(
            "entry_threshold",
            "entry_threshold must be a non-negative number",
        ));
    }
    if !config.exit_threshold.is_finite() {
        return Err(StatArbError::invalid_config(
            "exit_threshold",
            "exit_threshold must be a finite number",
        ));
    }
    if config.lookback_window == 0 {
        return Err(StatArbError::invalid_config(
            "lookback_window",
            "lookback_window must be at least 1",
        ));
    }
    Ok(())
}

fn parse_double(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, StatArbError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| StatArbError::invalid_config(key, format!("'{raw}' is not a number"))),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), StatArbError> {
    let capital = parse_double(config, "initial_capital")?;
    if capital.is_some_and(|v| !(v > 0.0 && v.is_finite())) {
        return Err(StatArbError::invalid_config(
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), StatArbError> {
    let entry = parse_double(config, "entry_threshold")?;
    if entry.is_some_and(|v| !v.is_finite() || v < 0.0) {
        return Err(StatArbError::invalid_config(
            "entry_threshold",
            "entry_threshold must be a non-negative number",
        ));
    }
    let exit = parse_double(config, "exit_threshold")?;
    if exit.is_some_and(|v| !v.is_finite()) {
        return Err(StatArbError::invalid_config(
            "exit_threshold",
            "exit_threshold must be a finite number",
        ));
    }
    Ok(())
}

fn validate_lookback_window(config: &dyn ConfigPort) -> Result<(), StatArbError> {
    let Some(raw) = config.get_string(SECTION, "lookback_window") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(()),
        Ok(_) => Err(StatArbError::invalid_config(
            "lookback_window",
            "lookback_window must be at least 1",
        )),
        Err(_) => Err(StatArbError::invalid_config(
            "lookback_window",
            format!("'{raw}' is not an integer"),
        )),
    }
}

fn validate_delayed_execution(config: &dyn ConfigPort) -> Result<(), StatArbError> {
    if !config.has_key(SECTION, "delayed_execution") {
        return Ok(());
    }
    // an unrecognized value falls back to whichever default is passed
    let parsed = config.get_bool(SECTION, "delayed_execution", true)
        == config.get_bool(SECTION, "delayed_execution", false);
    if !parsed {
        return Err(StatArbError::invalid_config(
            "delayed_execution",
            "delayed_execution must be true/false, yes/no or 1/0",
        ));
    }
    Ok(())
}
