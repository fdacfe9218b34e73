//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::capital::LevelCaps;
use crate::domain::config_validation::{
    check_symbol, validate_backtest_config, validate_run_settings, validate_strategy_config,
};
use crate::domain::error::GridTraderError;
use crate::domain::execution::{ExecutionConfig, PolicyKind, DEFAULT_DECAY_K};
use crate::domain::ohlcv::parse_timestamp;
use crate::domain::strategy::{GridStrategy, OrderMode};
use crate::domain::volume_profile::{parse_timeframes, GridConfig, VolumeProfileProvider};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_REPORT: &str = "grid_report.json";

#[derive(Parser, Debug)]
#[command(name = "gridtrader", about = "Capital-constrained grid trading backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// simple or progressive
        #[arg(long)]
        policy: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for one or all symbols
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols with a CSV file in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            policy,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbol.as_deref())
            } else {
                run_backtest_command(&config, symbol.as_deref(), policy.as_deref(), output.as_ref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

fn fail(e: &GridTraderError) -> ExitCode {
    eprintln!("error: {e}");
    e.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = GridTraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

pub fn data_adapter(config: &dyn ConfigPort) -> CsvAdapter {
    let dir = config
        .get_string("backtest", "data_dir")
        .unwrap_or_else(|| ".".to_string());
    CsvAdapter::new(PathBuf::from(dir))
}

fn optional_timestamp(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<chrono::NaiveDateTime>, GridTraderError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| GridTraderError::ConfigInvalid {
                section: "backtest".into(),
                key: key.into(),
                reason: format!("invalid timestamp '{raw}'"),
            }),
    }
}

pub fn build_backtest_config(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<BacktestConfig, GridTraderError> {
    let symbol = symbol_override
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .ok_or_else(|| GridTraderError::ConfigMissing {
            section: "backtest".into(),
            key: "symbol".into(),
        })?
        .to_uppercase();
    check_symbol(&symbol)?;

    Ok(BacktestConfig {
        symbol,
        initial_capital: config.get_double("backtest", "initial_capital", 10_000.0),
        risk_free_rate: config.get_double("backtest", "risk_free_rate", 0.0),
        start: optional_timestamp(config, "start")?,
        end: optional_timestamp(config, "end")?,
    })
}

fn non_negative(config: &dyn ConfigPort, section: &str, key: &str, default: i64) -> usize {
    usize::try_from(config.get_int(section, key, default)).unwrap_or(0)
}

pub fn build_strategy(
    config: &dyn ConfigPort,
    policy_override: Option<&str>,
) -> Result<GridStrategy, GridTraderError> {
    let policy = match policy_override.or(config.get_string("execution", "policy").as_deref()) {
        Some(raw) => raw.parse::<PolicyKind>()?,
        None => PolicyKind::Simple,
    };
    let order_mode = match config.get_string("strategy", "order_mode") {
        Some(raw) => raw.parse::<OrderMode>()?,
        None => OrderMode::Pending,
    };

    let defaults = GridConfig::default();
    let timeframes = match config.get_string("grid", "timeframes") {
        Some(raw) => parse_timeframes(&raw)?,
        None => defaults.timeframes,
    };

    Ok(GridStrategy {
        name: config
            .get_string("strategy", "name")
            .unwrap_or_else(|| "grid".to_string()),
        caps: LevelCaps {
            support_1_pct: config.get_double("strategy", "support_1_cap_pct", 20.0),
            support_2_pct: config.get_double("strategy", "support_2_cap_pct", 30.0),
        },
        stop_loss_pct: config.get_double("strategy", "stop_loss_pct", 5.0),
        order_validity_bars: u32::try_from(config.get_int("strategy", "order_validity_bars", 24))
            .unwrap_or(1)
            .max(1),
        order_mode,
        policy,
        execution: ExecutionConfig {
            fee_pct: config.get_double("execution", "fee_pct", 0.1),
            min_notional: config.get_double("strategy", "min_order_notional", 10.0),
        },
        decay_k: config.get_double("execution", "decay_k", DEFAULT_DECAY_K),
        grid: GridConfig {
            timeframes,
            bins: non_negative(config, "grid", "bins", defaults.bins as i64),
            min_bars: non_negative(config, "grid", "min_bars", defaults.min_bars as i64),
            cluster_quantile: config.get_double("grid", "cluster_quantile", defaults.cluster_quantile),
            zone_width_pct: config.get_double("grid", "zone_width_pct", defaults.zone_width_pct),
            ma_period: non_negative(config, "grid", "ma_period", defaults.ma_period as i64),
            ma_nudge_max_pct: config.get_double("grid", "ma_nudge_max_pct", defaults.ma_nudge_max_pct),
        },
    })
}

/// Load bars, build the volume-profile grid over them and replay.
///
/// Bars before `start` are still loaded so the grid has history on the
/// first replayed bar.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    strategy: &GridStrategy,
) -> Result<BacktestResult, GridTraderError> {
    let bars = data_port.fetch_bars(&bt_config.symbol, None, bt_config.end)?;
    let provider = VolumeProfileProvider::new(
        bt_config.symbol.clone(),
        bars.clone(),
        strategy.grid.clone(),
    );
    run_backtest(bt_config, strategy, &bars, &provider)
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    eprintln!("\n{} [{} / {}]", result.symbol, result.policy, result.order_mode);
    eprintln!("  Initial capital:  {:.2}", result.initial_capital);
    eprintln!("  Final capital:    {:.2}", result.final_capital);
    eprintln!("  Total return:     {:.2}%", result.total_return_pct);
    eprintln!(
        "  Bars:             {} processed, {} skipped",
        result.counters.bars_processed, result.counters.bars_skipped
    );
    eprintln!(
        "  Orders:           {} created, {} expired, {} cancelled",
        result.counters.orders_created,
        result.counters.orders_expired,
        result.counters.orders_cancelled
    );
    eprintln!(
        "  Trades:           {} buys, {} sells, {} stop-losses",
        result.counters.buys, result.counters.sells, result.counters.stop_losses
    );
    eprintln!(
        "  Positions:        {} opened, {} closed, win rate {:.1}%",
        result.positions_opened, result.positions_closed, result.win_rate_pct
    );
    eprintln!("  Max drawdown:     {:.2}%", m.max_drawdown * 100.0);
    eprintln!("  Sharpe / Sortino: {:.2} / {:.2}", m.sharpe_ratio, m.sortino_ratio);
}

fn run_backtest_command(
    config_path: &Path,
    symbol: Option<&str>,
    policy: Option<&str>,
    output: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let checked = match symbol {
        Some(_) => validate_run_settings(&adapter),
        None => validate_backtest_config(&adapter),
    };
    if let Err(e) = checked.and_then(|()| validate_strategy_config(&adapter)) {
        return fail(&e);
    }

    // Stage 2: build run parameters
    let bt_config = match build_backtest_config(&adapter, symbol) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let strategy = match build_strategy(&adapter, policy) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    // Stage 3: replay
    eprintln!(
        "Running {} on {} with {} policy",
        strategy.name, bt_config.symbol, strategy.policy
    );
    let data = data_adapter(&adapter);
    let result = match run_backtest_pipeline(&data, &bt_config, &strategy) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    print_summary(&result);

    // Stage 4: report
    let output = output
        .map(|p| p.display().to_string())
        .or_else(|| adapter.get_string("report", "output"))
        .unwrap_or_else(|| DEFAULT_REPORT.to_string());
    let reporter = JsonReportAdapter::new(adapter.get_bool("report", "pretty", true));
    match reporter.write(&result, &strategy, &output) {
        Ok(()) => {
            eprintln!("\nReport written to: {output}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

pub fn run_dry_run(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let checked =
        validate_run_settings(&adapter).and_then(|()| validate_strategy_config(&adapter));
    if let Err(e) = checked {
        return fail(&e);
    }
    let bt_config = match build_backtest_config(&adapter, symbol) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let strategy = match build_strategy(&adapter, None) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    eprintln!("Config validated successfully");

    eprintln!("\nStrategy:");
    eprintln!("  name:            {}", strategy.name);
    eprintln!(
        "  level caps:      {}% / {}%",
        strategy.caps.support_1_pct, strategy.caps.support_2_pct
    );
    eprintln!("  policy:          {}", strategy.policy);
    eprintln!("  order mode:      {}", strategy.order_mode);
    eprintln!("  order validity:  {} bars", strategy.order_validity_bars);
    eprintln!("  timeframes:      {}", strategy.grid.timeframes.len());

    let data = data_adapter(&adapter);
    match data.get_data_range(&bt_config.symbol) {
        Ok(Some((first, last, count))) => {
            eprintln!("\nData: {} bars, {} to {}", count, first, last);
        }
        Ok(None) => {
            let e = GridTraderError::NoData {
                symbol: bt_config.symbol,
            };
            return fail(&e);
        }
        Err(e) => return fail(&e),
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(&e);
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        return fail(&e);
    }

    let known = ["backtest", "strategy", "execution", "grid", "report"];
    for section in adapter.sections() {
        if !known.contains(&section.as_str()) {
            eprintln!("warning: unknown section [{section}] is ignored");
        }
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = data_adapter(&config);

    let symbols = match symbol {
        Some(s) => {
            if let Err(e) = check_symbol(s) {
                return fail(&e);
            }
            vec![s.to_uppercase()]
        }
        None => match data.list_symbols() {
            Ok(s) => s,
            Err(e) => return fail(&e),
        },
    };

    for s in &symbols {
        match data.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{s}: {count} bars, {first} to {last}");
            }
            Ok(None) => eprintln!("{s}: no data found"),
            Err(e) => eprintln!("error reading {s}: {e}"),
        }
    }
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match data_adapter(&config).list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{symbol}");
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
