//! CLI definition and dispatch.

use chrono::{NaiveDateTime, Timelike};
use clap::{ArgAction, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_ledger_adapter::JsonLedgerAdapter;
use crate::adapters::throttled_data_port::ThrottledDataPort;
use crate::adapters::universe_adapter::universe_from_config;
use crate::domain::config_validation::{
    DataSettings, load_data_settings, load_strategy_params, validate_universe_config,
};
use crate::domain::entry::EntryDecision;
use crate::domain::error::SwingError;
use crate::domain::ledger::Ledger;
use crate::domain::scan::{CycleReport, run_cycle, scan_instrument};
use crate::domain::series::EnrichedSeries;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::report_port::ReportPort;
use crate::ports::universe_port::UniversePort;

#[derive(Parser, Debug)]
#[command(name = "swingscan", about = "Daily swing-trade scanner", version)]
pub struct Cli {
    /// Raise log verbosity to debug
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scan cycle: entries for the universe, then exits for open positions
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        /// Validate configuration and print the rule set without scanning
        #[arg(long)]
        dry_run: bool,
    },
    /// List positions in the ledger
    Positions {
        #[arg(short, long)]
        config: PathBuf,
        /// Include closed positions
        #[arg(long)]
        all: bool,
    },
    /// Evaluate one instrument without touching the ledger
    Inspect {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Scan { config, dry_run } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_scan(&config)
            }
        }
        Command::Positions { config, all } => run_positions(&config, all),
        Command::Inspect { config, code } => run_inspect(&config, &code),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// stderr subscriber; `RUST_LOG` wins unless `-v` was given.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = if verbose > 0 {
        EnvFilter::new("swingscan=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swingscan=info"))
    };

    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SwingError> {
    FileConfigAdapter::from_file(path).map_err(|e| SwingError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Bar source named by `[data] source`, before retry/pacing is applied.
pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, SwingError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string());

    match source.trim() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .ok_or_else(|| SwingError::config_missing("data", "csv_dir"))?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir.trim()))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            Ok(Box::new(adapter))
        }
        other => Err(SwingError::config_invalid(
            "data",
            "source",
            format!("unsupported data source '{other}'"),
        )),
    }
}

pub fn build_ledger_port(config: &dyn ConfigPort) -> Result<Box<dyn LedgerPort>, SwingError> {
    let backend = config
        .get_string("ledger", "backend")
        .unwrap_or_else(|| "json".to_string());

    match backend.trim() {
        "json" => {
            let path = config
                .get_string("ledger", "path")
                .unwrap_or_else(|| "portfolio.json".to_string());
            Ok(Box::new(JsonLedgerAdapter::new(path.trim())))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let adapter = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
            Ok(Box::new(adapter))
        }
        other => Err(SwingError::config_invalid(
            "ledger",
            "backend",
            format!("unsupported ledger backend '{other}'"),
        )),
    }
}

fn throttled(
    config: &dyn ConfigPort,
    settings: &DataSettings,
) -> Result<ThrottledDataPort<Box<dyn DataPort>>, SwingError> {
    Ok(ThrottledDataPort::new(
        build_data_port(config)?,
        settings.attempts,
        Duration::from_millis(settings.delay_ms),
    ))
}

fn report_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("report", "dir")
        .map(|d| PathBuf::from(d.trim()))
        .unwrap_or_else(|| PathBuf::from("reports"))
}

/// Full cycle: load ledger, scan, write reports, persist ledger.
/// The ledger is saved last, so any earlier failure leaves it as loaded.
pub fn execute_scan(
    config: &dyn ConfigPort,
    now: NaiveDateTime,
) -> Result<(CycleReport, Ledger), SwingError> {
    let params = load_strategy_params(config)?;
    let settings = load_data_settings(config, &params)?;
    validate_universe_config(config)?;

    let universe = universe_from_config(config)?.load_universe()?;
    let data = throttled(config, &settings)?;
    let ledger_port = build_ledger_port(config)?;

    let mut ledger = ledger_port.load()?;
    let report = run_cycle(
        &universe,
        &data,
        &mut ledger,
        &params,
        settings.lookback_bars,
        now,
    )?;
    CsvReportAdapter::new(report_dir(config)).write(&report)?;
    ledger_port.save(&ledger)?;

    Ok((report, ledger))
}

fn run_scan(config_path: &Path) -> Result<(), SwingError> {
    info!(config = %config_path.display(), "loading config");
    let config = load_config(config_path)?;

    let now = chrono::Local::now().naive_local();
    let now = now.with_nanosecond(0).unwrap_or(now);

    let (report, _) = execute_scan(&config, now)?;
    print_report(&report);
    Ok(())
}

fn run_dry_run(config_path: &Path) -> Result<(), SwingError> {
    let config = load_config(config_path)?;
    let params = load_strategy_params(&config)?;
    let settings = load_data_settings(&config, &params)?;
    validate_universe_config(&config)?;
    let universe = universe_from_config(&config)?.load_universe()?;
    build_data_port(&config)?;
    build_ledger_port(&config)?;

    println!("{}", rule_set_table(&params, &settings));
    println!("Universe: {} codes", universe.count());
    println!("Dry run complete: configuration is valid");
    Ok(())
}

fn run_positions(config_path: &Path, all: bool) -> Result<(), SwingError> {
    let config = load_config(config_path)?;
    let ledger = build_ledger_port(&config)?.load()?;
    println!("{}", positions_table(&ledger, all));
    println!(
        "{} positions ({} open)",
        ledger.len(),
        ledger.open_count()
    );
    Ok(())
}

fn run_inspect(config_path: &Path, code: &str) -> Result<(), SwingError> {
    let config = load_config(config_path)?;
    let params = load_strategy_params(&config)?;
    let settings = load_data_settings(&config, &params)?;
    let data = throttled(&config, &settings)?;

    let (series, decision) = scan_instrument(&data, code, &params, settings.lookback_bars)
        .ok_or_else(|| SwingError::DataSource {
            code: code.to_string(),
            reason: "no usable bars".to_string(),
        })?;
    println!("{}", inspect_table(&series, &decision, &params));
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn fmt_check(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

pub fn print_report(report: &CycleReport) {
    if report.buys.is_empty() {
        println!("No BUY signals");
    } else {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["BUY", "Price", "RSI(14)", "Volume x"]);
        for row in &report.buys {
            table.add_row(vec![
                Cell::new(&row.code),
                Cell::new(fmt_opt(row.price)),
                Cell::new(fmt_opt(row.rsi_medium)),
                Cell::new(fmt_opt(row.volume_multiple)),
            ]);
        }
        println!("{table}");
    }

    if !report.sells.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["SELL", "Entry", "Exit", "Reason", "Return %"]);
        for row in &report.sells {
            table.add_row(vec![
                Cell::new(&row.code),
                Cell::new(format!("{:.2}", row.entry_price)),
                Cell::new(format!("{:.2}", row.exit_price)),
                Cell::new(row.reason),
                Cell::new(format!("{:+.2}", row.return_pct)),
            ]);
        }
        println!("{table}");
    }

    if !report.deferred.is_empty() {
        println!("Exit check deferred (no data): {}", report.deferred.join(", "));
    }
    println!("{}", status_line(report));
}

pub fn status_line(report: &CycleReport) -> String {
    format!(
        "Scan completed | BUY: {} | SELL: {} | Universe scanned: {}",
        report.buys.len(),
        report.sells.len(),
        report.universe_size
    )
}

fn rule_set_table(params: &StrategyParams, settings: &DataSettings) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Rule", "Value"]);
    let rows: Vec<(String, String)> = vec![
        (
            "Oversold".into(),
            format!(
                "RSI({}) < {}, RSI({}) < {}, RSI({}) < {}",
                params.rsi_medium_period,
                params.rsi_medium_max,
                params.rsi_short_period,
                params.rsi_short_max,
                params.rsi_long_period,
                params.rsi_long_max
            ),
        ),
        (
            "Trend".into(),
            format!(
                "close > SMA({long}) or SMA({}) > SMA({long})",
                params.ma_short_period,
                long = params.ma_long_period
            ),
        ),
        (
            "Volume".into(),
            format!(
                "volume > {} x VOLUME_SMA({})",
                params.volume_multiple, params.volume_period
            ),
        ),
        ("Candle".into(), "close > open and close > previous close".into()),
        ("Stop loss".into(), format!("entry x {}", params.stop_loss_factor)),
        ("Target".into(), format!("entry x {}", params.target_factor)),
        (
            "RSI exit".into(),
            format!("RSI({}) > {}", params.rsi_medium_period, params.rsi_exit_level),
        ),
        (
            "Swing high exit".into(),
            format!("close >= HIGHEST_HIGH({})", params.swing_high_period),
        ),
        ("Min history".into(), format!("{} bars", params.min_history)),
        ("Lookback".into(), format!("{} bars", settings.lookback_bars)),
        (
            "Fetch".into(),
            format!(
                "{} attempts, {} ms between instruments",
                settings.attempts, settings.delay_ms
            ),
        ),
    ];
    for (rule, value) in rows {
        table.add_row(vec![rule, value]);
    }
    table
}

fn positions_table(ledger: &Ledger, all: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#", "Code", "Status", "Entry", "Entered", "Stop", "Target", "Exit", "Reason", "Return %",
    ]);
    for (i, p) in ledger.positions().iter().enumerate() {
        if !all && !p.is_open() {
            continue;
        }
        table.add_row(vec![
            i.to_string(),
            p.code.clone(),
            p.status.to_string(),
            format!("{:.2}", p.entry_price),
            p.entry_time.format("%Y-%m-%d %H:%M").to_string(),
            format!("{:.2}", p.stop_loss),
            format!("{:.2}", p.target_price),
            fmt_opt(p.exit_price),
            p.exit_reason.map(|r| r.to_string()).unwrap_or_default(),
            fmt_opt(p.realized_return().map(|r| r * 100.0)),
        ]);
    }
    table
}

fn inspect_table(series: &EnrichedSeries, decision: &EntryDecision, params: &StrategyParams) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![series.code.clone(), format!("{} bars", series.len())]);

    if let Some((bar, snap)) = series.latest() {
        let mut rows = vec![
            ("Date".to_string(), bar.date.to_string()),
            ("Close".to_string(), format!("{:.2}", bar.close)),
        ];
        let values = [
            snap.rsi_short,
            snap.rsi_medium,
            snap.rsi_long,
            snap.ma_short,
            snap.ma_long,
            snap.volume_avg,
            snap.swing_high,
            snap.swing_low,
        ];
        // indicator_types() lists indicators in snapshot field order.
        for (indicator, value) in params.indicator_types().into_iter().zip(values) {
            rows.push((indicator.to_string(), fmt_opt(value)));
        }
        for (name, value) in rows {
            table.add_row(vec![name, value]);
        }
    }

    let checks = decision.evidence.map(|e| e.checks);
    for (name, value) in [
        ("Oversold", checks.map(|c| c.oversold)),
        ("Trend", checks.map(|c| c.trend)),
        ("Volume spike", checks.map(|c| c.volume)),
        ("Bullish candle", checks.map(|c| c.candle)),
    ] {
        table.add_row(vec![name.to_string(), fmt_check(value).to_string()]);
    }
    table.add_row(vec!["Decision".to_string(), decision.kind.to_string()]);
    table
}
