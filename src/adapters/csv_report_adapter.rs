//! CSV report sink.
//!
//! Per cycle, in the report directory:
//! - `scan_YYYYMMDD.csv`: every evaluated instrument (always written)
//! - `buys_YYYYMMDD.csv`: BUY rows, only when there are any
//! - `sells_YYYYMMDD.csv`: closed positions, only when there are any

use crate::domain::error::SwingError;
use crate::domain::scan::CycleReport;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SCAN_HEADERS: [&str; 10] = [
    "code",
    "decision",
    "price",
    "rsi_medium",
    "volume_multiple",
    "oversold",
    "trend",
    "volume_spike",
    "candle",
    "bars",
];

pub struct CsvReportAdapter {
    dir: PathBuf,
}

impl CsvReportAdapter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn report_path(&self, prefix: &str, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", prefix, date.format("%Y%m%d")))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T], headers: &[&str]) -> Result<(), SwingError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| SwingError::storage(format!("failed to create {}: {}", path.display(), e)))?;
    if rows.is_empty() {
        wtr.write_record(headers).map_err(SwingError::storage)?;
    }
    for row in rows {
        wtr.serialize(row).map_err(SwingError::storage)?;
    }
    wtr.flush()
        .map_err(|e| SwingError::storage(format!("failed to write {}: {}", path.display(), e)))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &CycleReport) -> Result<(), SwingError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            SwingError::storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;
        let date = report.run_at.date();

        let scan_path = self.report_path("scan", date);
        write_rows(&scan_path, &report.trace, &SCAN_HEADERS)?;
        info!(path = %scan_path.display(), rows = report.trace.len(), "scan report written");

        if !report.buys.is_empty() {
            write_rows(&self.report_path("buys", date), &report.buys, &SCAN_HEADERS)?;
        }
        if !report.sells.is_empty() {
            write_rows(&self.report_path("sells", date), &report.sells, &[])?;
        }
        Ok(())
    }
}
