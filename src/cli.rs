//! CLI definition and pipeline.

use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use crate::adapters::csv_adapter::CsvMarketData;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, BacktestResult, Backtester};
use crate::domain::config_validation::{validate_backtest_config, validate_backtest_section};
use crate::domain::error::StatArbError;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "statarb",
    about = "Pairs-trading statistical arbitrage backtester"
)]
pub struct Cli {
    /// Wide-format price CSV: Date,SYM1,SYM2,...
    pub data_file: PathBuf,

    /// INI file with [backtest] and [pairs] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Initial capital (default: 1000000)
    #[arg(long)]
    pub capital: Option<f64>,

    /// Entry threshold in standard deviations (default: 1.5)
    #[arg(long, allow_negative_numbers = true)]
    pub entry: Option<f64>,

    /// Exit threshold in standard deviations (default: 0.0)
    #[arg(long, allow_negative_numbers = true)]
    pub exit: Option<f64>,

    /// Rolling z-score lookback window in days (default: 20)
    #[arg(long)]
    pub window: Option<usize>,

    /// Fill on the signal day instead of T+1
    #[arg(long)]
    pub immediate: bool,

    /// Pair to test, as A:B. Repeatable. Default: every symbol combination
    #[arg(long = "pair", value_name = "A:B")]
    pub pairs: Vec<String>,

    /// Output file for the daily portfolio values
    #[arg(short, long, default_value = "results.csv")]
    pub output: PathBuf,

    /// Log progress at info level
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    match run_pipeline(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// `RUST_LOG` wins over the verbosity flag. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StatArbError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

fn run_pipeline(cli: &Cli) -> Result<(), StatArbError> {
    // Stage 1: Config (defaults < INI < flags)
    let adapter = cli.config.as_deref().map(load_config).transpose()?;
    let base = match &adapter {
        Some(a) => build_backtest_config(a)?,
        None => BacktestConfig::default(),
    };
    let bt_config = apply_overrides(base, cli);
    validate_backtest_config(&bt_config)?;

    // Stage 2: Market data
    eprintln!("Loading market data from {}", cli.data_file.display());
    let market = CsvMarketData::from_path(&cli.data_file)?;
    if market.data_size() == 0 {
        return Err(StatArbError::NoMarketData);
    }
    let symbols = market.available_symbols();
    eprintln!(
        "Loaded {} days of data for {} symbols",
        market.data_size(),
        symbols.len()
    );
    if symbols.len() < 2 {
        return Err(StatArbError::InsufficientSymbols {
            found: symbols.len(),
        });
    }

    // Stage 3: Pair screening
    let pairs = resolve_pairs(&cli.pairs, adapter.as_ref().map(|a| a as &dyn ConfigPort), &symbols)?;
    if cli.pairs.is_empty() {
        eprintln!("Analyzing {} candidate pairs for cointegration...", pairs.len());
    }

    let mut backtester = Backtester::new(&market);
    for (a, b) in &pairs {
        backtester.add_pair(a, b);
    }
    eprintln!(
        "Accepted {} of {} pairs",
        backtester.pairs().len(),
        pairs.len()
    );

    // Stage 4: Simulation
    eprintln!("\nRunning backtest with parameters:");
    eprintln!("Initial Capital:  ${:.2}", bt_config.initial_capital);
    eprintln!("Entry Threshold:  {} sigma", bt_config.entry_threshold);
    eprintln!("Exit Threshold:   {} sigma", bt_config.exit_threshold);
    eprintln!("Lookback Window:  {} days", bt_config.lookback_window);
    eprintln!(
        "Execution:        {}",
        if bt_config.delayed_execution {
            "T+1"
        } else {
            "Same day"
        }
    );

    let result = backtester.run_backtest(&bt_config)?;

    // Stage 5: Console summary
    print_summary(&result);

    // Stage 6: Export
    eprintln!("\nExporting results to {}", cli.output.display());
    CsvReportAdapter::new().write(&result, &cli.output)?;
    eprintln!("Results successfully exported");
    Ok(())
}

/// Read the `[backtest]` section over the built-in defaults.
pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, StatArbError> {
    validate_backtest_section(adapter)?;

    let defaults = BacktestConfig::default();
    let lookback_window = adapter.get_int(
        "backtest",
        "lookback_window",
        defaults.lookback_window as i64,
    );

    Ok(BacktestConfig {
        initial_capital: adapter.get_double(
            "backtest",
            "initial_capital",
            defaults.initial_capital,
        ),
        entry_threshold: adapter.get_double(
            "backtest",
            "entry_threshold",
            defaults.entry_threshold,
        ),
        exit_threshold: adapter.get_double("backtest", "exit_threshold", defaults.exit_threshold),
        lookback_window: usize::try_from(lookback_window).map_err(|_| {
            StatArbError::invalid_config("lookback_window", "lookback_window must be at least 1")
        })?,
        delayed_execution: adapter.get_bool(
            "backtest",
            "delayed_execution",
            defaults.delayed_execution,
        ),
    })
}

/// Command-line flags take precedence over everything else.
pub fn apply_overrides(mut config: BacktestConfig, cli: &Cli) -> BacktestConfig {
    if let Some(capital) = cli.capital {
        config.initial_capital = capital;
    }
    if let Some(entry) = cli.entry {
        config.entry_threshold = entry;
    }
    if let Some(exit) = cli.exit {
        config.exit_threshold = exit;
    }
    if let Some(window) = cli.window {
        config.lookback_window = window;
    }
    if cli.immediate {
        config.delayed_execution = false;
    }
    config
}

/// Parse `A:B` into its two symbols.
pub fn parse_pair(text: &str) -> Result<(String, String), StatArbError> {
    let invalid = |reason: &str| StatArbError::ConfigInvalid {
        section: "pairs".to_string(),
        key: "pairs".to_string(),
        reason: format!("'{text}': {reason}"),
    };

    let (a, b) = text
        .split_once(':')
        .ok_or_else(|| invalid("expected SYMBOL_A:SYMBOL_B"))?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return Err(invalid("empty symbol"));
    }
    if a == b {
        return Err(invalid("a pair needs two different symbols"));
    }
    Ok((a.to_string(), b.to_string()))
}

/// Pairs from the command line, else the INI `[pairs]` list, else every
/// unordered combination of `symbols` in their given order.
pub fn resolve_pairs(
    cli_pairs: &[String],
    config: Option<&dyn ConfigPort>,
    symbols: &[String],
) -> Result<Vec<(String, String)>, StatArbError> {
    if !cli_pairs.is_empty() {
        return cli_pairs.iter().map(|p| parse_pair(p)).collect();
    }

    if let Some(list) = config.and_then(|c| c.get_string("pairs", "pairs")) {
        let pairs: Vec<_> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_pair)
            .collect::<Result<_, _>>()?;
        if !pairs.is_empty() {
            return Ok(pairs);
        }
    }

    let mut pairs = Vec::with_capacity(symbols.len() * symbols.len().saturating_sub(1) / 2);
    for (i, a) in symbols.iter().enumerate() {
        for b in &symbols[i + 1..] {
            pairs.push((a.clone(), b.clone()));
        }
    }
    Ok(pairs)
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;

    eprintln!("\n=== Backtest Results ===");
    eprintln!("Pairs Traded:     {}", result.pair_count);
    eprintln!("Total Return:     {:.2}%", m.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", m.annualized_return * 100.0);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     -{:.1}%", m.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", m.total_trades());
    eprintln!("Win Rate:         {:.1}%", m.win_rate() * 100.0);
    eprintln!("Avg Holding:      {:.1} days", m.avg_holding_period);
    eprintln!("Avg Win:          ${:.2}", m.avg_win);
    eprintln!("Avg Loss:         ${:.2}", m.avg_loss);

    // (trades, wins, pnl) per pair
    let mut per_pair: BTreeMap<String, (usize, usize, f64)> = BTreeMap::new();
    for trade in &result.trades {
        let entry = per_pair
            .entry(format!("{}/{}", trade.symbol_a, trade.symbol_b))
            .or_default();
        entry.0 += 1;
        if trade.is_win() {
            entry.1 += 1;
        }
        entry.2 += trade.pnl;
    }

    if !per_pair.is_empty() {
        eprintln!("\n=== Per-Pair Summary ===");
        for (label, (trades, wins, pnl)) in &per_pair {
            let pnl_sign = if *pnl >= 0.0 { "+" } else { "-" };
            eprintln!(
                "  {}:  {} trades, {:.1}% win rate, {}${:.0}",
                label,
                trades,
                *wins as f64 / *trades as f64 * 100.0,
                pnl_sign,
                pnl.abs(),
            );
        }
    }

    if !result.open_positions.is_empty() {
        eprintln!("\nOpen at end: {} position(s)", result.open_positions.len());
        for (label, pos) in &result.open_positions {
            eprintln!("  {}: {:?} since day {}", label, pos.direction, pos.entry_day);
        }
    }
}
