//! CLI orchestration tests with real INI, CSV and JSON files on disk.
//!
//! Tests cover:
//! - Full scan: config -> universe -> CSV bars -> ledger file -> report files
//! - A second run closing the position opened by the first
//! - Config and report failures surface before the ledger is touched
//! - Exit status mapping for each error family

mod common;

use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use swingscan::cli;
use swingscan::domain::entry::DecisionKind;
use swingscan::domain::error::SwingError;
use swingscan::domain::position::{ExitReason, PositionStatus};
use swingscan::ports::ledger_port::LedgerPort;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Workspace with a symbol list, a bar directory and an INI pointing at both.
fn workspace(symbols: &[&str]) -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("bars")).unwrap();

    let mut list = String::from("Symbol,NAME OF COMPANY\n");
    for s in symbols {
        list.push_str(&format!("{s},{s} Ltd\n"));
    }
    fs::write(root.join("EQUITY_L.csv"), list).unwrap();

    let ini = format!(
        r#"
[universe]
csv_path = {root}/EQUITY_L.csv
suffix = .NS

[data]
source = csv
csv_dir = {root}/bars
lookback_bars = 260
attempts = 2
delay_ms = 0

[ledger]
backend = json
path = {root}/state/portfolio.json

[report]
dir = {root}/reports
"#,
        root = root.display()
    );
    (dir, ini)
}

fn load_ini(ini: &str) -> swingscan::adapters::file_config_adapter::FileConfigAdapter {
    let file = write_temp_ini(ini);
    cli::load_config(file.path()).unwrap()
}

fn ledger_at(root: &Path) -> swingscan::domain::ledger::Ledger {
    swingscan::adapters::json_ledger_adapter::JsonLedgerAdapter::new(
        root.join("state/portfolio.json"),
    )
    .load()
    .unwrap()
}

mod full_scan {
    use super::*;

    #[test]
    fn scan_persists_buy_and_writes_reports() {
        let (dir, ini) = workspace(&["RELIANCE", "TCS"]);
        write_bars_csv(&dir.path().join("bars"), "RELIANCE.NS", &oversold_bounce_bars());
        write_bars_csv(&dir.path().join("bars"), "TCS.NS", &bars_ending_at(3500.0));
        let config = load_ini(&ini);

        let (report, ledger) = cli::execute_scan(&config, at(2024, 7, 18)).unwrap();

        assert_eq!(report.universe_size, 2);
        assert_eq!(report.buys.len(), 1);
        assert_eq!(report.buys[0].code, "RELIANCE.NS");
        assert_eq!(report.trace[1].decision, DecisionKind::None);
        assert_eq!(
            cli::status_line(&report),
            "Scan completed | BUY: 1 | SELL: 0 | Universe scanned: 2"
        );

        let stored = ledger_at(dir.path());
        assert_eq!(stored, ledger);
        assert_eq!(stored.open_count(), 1);

        let scan_csv = fs::read_to_string(dir.path().join("reports/scan_20240718.csv")).unwrap();
        assert_eq!(scan_csv.lines().count(), 3);
        assert!(dir.path().join("reports/buys_20240718.csv").exists());
        assert!(!dir.path().join("reports/sells_20240718.csv").exists());
    }

    #[test]
    fn second_run_stops_out_first_runs_position() {
        let (dir, ini) = workspace(&["RELIANCE"]);
        let bars_dir = dir.path().join("bars");
        let mut bars = oversold_bounce_bars();
        write_bars_csv(&bars_dir, "RELIANCE.NS", &bars);
        let config = load_ini(&ini);

        cli::execute_scan(&config, at(2024, 7, 18)).unwrap();

        let mut gap_down = bars.last().unwrap().clone();
        gap_down.date = gap_down.date.succ_opt().unwrap();
        gap_down.open = 195.0;
        gap_down.high = 196.0;
        gap_down.low = 189.0;
        gap_down.close = 190.0;
        gap_down.volume = 1500;
        bars.push(gap_down);
        write_bars_csv(&bars_dir, "RELIANCE.NS", &bars);

        let (report, _) = cli::execute_scan(&config, at(2024, 7, 19)).unwrap();

        assert_eq!(report.sells.len(), 1);
        assert_eq!(report.sells[0].reason, ExitReason::StopLoss);
        assert_eq!(report.sells[0].exit_price, 190.0);

        let stored = ledger_at(dir.path());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.positions()[0].status, PositionStatus::Closed);
        assert!(dir.path().join("reports/sells_20240719.csv").exists());
    }

    #[test]
    fn empty_symbol_list_is_a_quiet_cycle() {
        let (dir, ini) = workspace(&[]);
        let config = load_ini(&ini);

        let (report, ledger) = cli::execute_scan(&config, at(2024, 7, 18)).unwrap();

        assert!(report.buys.is_empty());
        assert!(report.sells.is_empty());
        assert!(report.trace.is_empty());
        assert!(ledger.is_empty());
        assert!(dir.path().join("reports/scan_20240718.csv").exists());
    }
}

mod config_failures {
    use super::*;

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/swingscan.ini")).unwrap_err();
        assert!(matches!(err, SwingError::ConfigParse { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn invalid_strategy_aborts_before_ledger_is_written() {
        let (dir, ini) = workspace(&["RELIANCE"]);
        write_bars_csv(&dir.path().join("bars"), "RELIANCE.NS", &oversold_bounce_bars());
        let ini = format!("{ini}\n[strategy]\nstop_loss_factor = 1.5\n");
        let config = load_ini(&ini);

        let err = cli::execute_scan(&config, at(2024, 7, 18)).unwrap_err();

        assert!(matches!(err, SwingError::ConfigInvalid { ref key, .. } if key == "stop_loss_factor"));
        assert!(!dir.path().join("state/portfolio.json").exists());
    }

    #[test]
    fn symbol_list_without_symbol_column_fails() {
        let (dir, ini) = workspace(&[]);
        fs::write(dir.path().join("EQUITY_L.csv"), "Ticker\nINFY\n").unwrap();
        let config = load_ini(&ini);

        let err = cli::execute_scan(&config, at(2024, 7, 18)).unwrap_err();
        assert!(matches!(err, SwingError::ConfigInvalid { ref key, .. } if key == "csv_path"));
    }

    #[test]
    fn corrupt_ledger_file_is_storage_error() {
        let (dir, ini) = workspace(&[]);
        fs::create_dir_all(dir.path().join("state")).unwrap();
        fs::write(dir.path().join("state/portfolio.json"), "[{").unwrap();
        let config = load_ini(&ini);

        let err = cli::execute_scan(&config, at(2024, 7, 18)).unwrap_err();
        assert!(matches!(err, SwingError::Storage { .. }));
        assert_eq!(err.exit_status(), 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("state/portfolio.json")).unwrap(),
            "[{"
        );
    }

    #[test]
    fn report_failure_leaves_ledger_unsaved_and_rerun_buys_once() {
        let (dir, ini) = workspace(&["RELIANCE"]);
        write_bars_csv(&dir.path().join("bars"), "RELIANCE.NS", &oversold_bounce_bars());
        fs::write(dir.path().join("reports"), "not a directory").unwrap();
        let config = load_ini(&ini);

        let err = cli::execute_scan(&config, at(2024, 7, 18)).unwrap_err();
        assert!(matches!(err, SwingError::Storage { .. }));
        assert!(!dir.path().join("state/portfolio.json").exists());

        fs::remove_file(dir.path().join("reports")).unwrap();
        let (report, _) = cli::execute_scan(&config, at(2024, 7, 18)).unwrap();

        assert_eq!(report.buys.len(), 1);
        let stored = ledger_at(dir.path());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.open_count(), 1);
    }

    #[test]
    fn report_failure_keeps_previously_stored_ledger() {
        let (dir, ini) = workspace(&["RELIANCE"]);
        let bars_dir = dir.path().join("bars");
        let mut bars = oversold_bounce_bars();
        write_bars_csv(&bars_dir, "RELIANCE.NS", &bars);
        let config = load_ini(&ini);
        cli::execute_scan(&config, at(2024, 7, 18)).unwrap();
        let before = fs::read_to_string(dir.path().join("state/portfolio.json")).unwrap();

        let mut gap_down = bars.last().unwrap().clone();
        gap_down.date = gap_down.date.succ_opt().unwrap();
        gap_down.open = 195.0;
        gap_down.high = 196.0;
        gap_down.low = 189.0;
        gap_down.close = 190.0;
        bars.push(gap_down);
        write_bars_csv(&bars_dir, "RELIANCE.NS", &bars);
        fs::remove_dir_all(dir.path().join("reports")).unwrap();
        fs::write(dir.path().join("reports"), "not a directory").unwrap();

        assert!(cli::execute_scan(&config, at(2024, 7, 19)).is_err());
        assert_eq!(
            fs::read_to_string(dir.path().join("state/portfolio.json")).unwrap(),
            before
        );
        assert_eq!(ledger_at(dir.path()).open_count(), 1);
    }

    #[test]
    fn duplicate_configured_codes_fail_with_universe_status() {
        let ini = "[universe]\ncodes = INFY.NS,infy.ns\n[data]\ncsv_dir = /tmp\n";
        let config = load_ini(ini);

        let err = cli::execute_scan(&config, at(2024, 7, 18)).unwrap_err();
        assert_eq!(err.exit_status(), 4);
    }
}
