//! Core domain types and logic.

pub mod stats;
pub mod signal;
pub mod pair;
pub mod position;
pub mod portfolio;
pub mod backtest;
pub mod metrics;
pub mod config_validation;
pub mod error;
