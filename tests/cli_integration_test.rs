//! CLI integration tests.
//!
//! Tests cover:
//! - Config precedence (defaults < INI < flags)
//! - Pair resolution from flags and INI
//! - Full `run` pipeline against files on disk, including exit codes

mod common;

use clap::Parser;
use common::*;
use statarb::adapters::file_config_adapter::FileConfigAdapter;
use statarb::cli::{self, Cli};
use statarb::domain::backtest::BacktestConfig;
use statarb::domain::config_validation::validate_backtest_config;
use statarb::domain::error::StatArbError;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["statarb"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn assert_exit(code: ExitCode, expected: u8) {
    // ExitCode has no accessor, compare via Debug
    assert_eq!(
        format!("{code:?}"),
        format!("{:?}", ExitCode::from(expected))
    );
}

mod config_precedence {
    use super::*;

    const INI: &str = r#"
[backtest]
initial_capital = 250000
entry_threshold = 2.0
lookback_window = 30
delayed_execution = true
"#;

    #[test]
    fn defaults_without_ini_or_flags() {
        let cli = parse(&["prices.csv"]);
        let config = cli::apply_overrides(BacktestConfig::default(), &cli);
        assert_eq!(config, BacktestConfig::default());
    }

    #[test]
    fn ini_over_defaults() {
        let adapter = FileConfigAdapter::from_string(INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();
        assert_eq!(config.initial_capital, 250_000.0);
        assert_eq!(config.entry_threshold, 2.0);
        assert_eq!(config.lookback_window, 30);
        assert_eq!(config.exit_threshold, 0.0);
        assert!(config.delayed_execution);
    }

    #[test]
    fn flags_over_ini() {
        let adapter = FileConfigAdapter::from_string(INI).unwrap();
        let cli = parse(&["prices.csv", "--window", "10", "--immediate", "--exit", "0.25"]);
        let config = cli::apply_overrides(cli::build_backtest_config(&adapter).unwrap(), &cli);

        assert_eq!(config.lookback_window, 10);
        assert!(!config.delayed_execution);
        assert_eq!(config.exit_threshold, 0.25);
        // untouched by flags
        assert_eq!(config.initial_capital, 250_000.0);
        assert_eq!(config.entry_threshold, 2.0);
    }

    #[test]
    fn invalid_flag_value_rejected_after_merge() {
        let cli = parse(&["prices.csv", "--capital", "0"]);
        let config = cli::apply_overrides(BacktestConfig::default(), &cli);
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, StatArbError::ConfigInvalid { ref key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn invalid_ini_value_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nentry_threshold = -2\n").unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(
            matches!(err, StatArbError::ConfigInvalid { ref key, .. } if key == "entry_threshold")
        );
    }

    #[test]
    fn config_file_on_disk() {
        let file = write_temp(INI, ".ini");
        let adapter = cli::load_config(file.path()).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();
        assert_eq!(config.lookback_window, 30);
    }
}

mod pair_resolution {
    use super::*;
    use statarb::ports::config_port::ConfigPort;

    fn symbols() -> Vec<String> {
        ["A1", "B1", "A2", "B2"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn every_combination_by_default() {
        let pairs = cli::resolve_pairs(&[], None, &symbols()).unwrap();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], ("A1".to_string(), "B1".to_string()));
        assert_eq!(pairs[5], ("A2".to_string(), "B2".to_string()));
    }

    #[test]
    fn ini_pair_list() {
        let adapter = FileConfigAdapter::from_string("[pairs]\npairs = A1:B1, A2:B2\n").unwrap();
        let config: &dyn ConfigPort = &adapter;
        let pairs = cli::resolve_pairs(&[], Some(config), &symbols()).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("A1".to_string(), "B1".to_string()),
                ("A2".to_string(), "B2".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_ini_pair_is_config_error() {
        let adapter = FileConfigAdapter::from_string("[pairs]\npairs = A1-B1\n").unwrap();
        let config: &dyn ConfigPort = &adapter;
        let err = cli::resolve_pairs(&[], Some(config), &symbols()).unwrap_err();
        assert!(matches!(err, StatArbError::ConfigInvalid { .. }));
    }
}

mod run_pipeline {
    use super::*;

    fn cointegrated_csv() -> String {
        let (a, b) = cointegrated_ab(120);
        let (d, c) = cointegrated_dc(120);
        to_csv(&[("A", &a), ("B", &b), ("C", &c), ("D", &d)])
    }

    #[test]
    fn full_run_writes_results() {
        let data = write_temp(&cointegrated_csv(), ".csv");
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.csv");

        let code = cli::run(parse(&[
            path_str(data.path()),
            "--entry",
            "1.0",
            "--window",
            "10",
            "--pair",
            "A:B",
            "--pair",
            "D:C",
            "--output",
            path_str(&output),
        ]));
        assert_exit(code, 0);

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Day,PortfolioValue");
        assert_eq!(lines.len(), 121);
    }

    #[test]
    fn all_combinations_with_config_file() {
        let data = write_temp(&two_pair_csv(), ".csv");
        let ini = write_temp("[backtest]\ninitial_capital = 100000\n", ".ini");
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("results.csv");

        let code = cli::run(parse(&[
            path_str(data.path()),
            "--config",
            path_str(ini.path()),
            "--output",
            path_str(&output),
        ]));
        assert_exit(code, 0);

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 101);
        assert!(content.lines().nth(1).unwrap().starts_with("0,"));
    }

    #[test]
    fn missing_data_file_exits_1() {
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(&dir.path().join("nope.csv")),
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 1);
    }

    #[test]
    fn missing_config_file_exits_2() {
        let data = write_temp(&two_pair_csv(), ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--config",
            path_str(&dir.path().join("missing.ini")),
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 2);
    }

    #[test]
    fn invalid_parameter_exits_2() {
        let data = write_temp(&two_pair_csv(), ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--window",
            "0",
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 2);
    }

    #[test]
    fn header_only_data_exits_5() {
        let data = write_temp("Date,A,B\n", ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 5);
    }

    #[test]
    fn single_symbol_exits_5() {
        let data = write_temp("Date,A\n2020-01-01,1.0\n2020-01-02,1.5\n", ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 5);
    }

    #[test]
    fn unwritable_output_exits_6() {
        let data = write_temp(&two_pair_csv(), ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--pair",
            "A1:B1",
            "--output",
            path_str(&dir.path().join("no_such_dir").join("out.csv")),
        ]));
        assert_exit(code, 6);
    }

    #[test]
    fn malformed_pair_flag_exits_2() {
        let data = write_temp(&two_pair_csv(), ".csv");
        let dir = TempDir::new().unwrap();
        let code = cli::run(parse(&[
            path_str(data.path()),
            "--pair",
            "A1B1",
            "--output",
            path_str(&dir.path().join("out.csv")),
        ]));
        assert_exit(code, 2);
    }
}
