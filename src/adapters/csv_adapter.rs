//! CSV directory bar source: one `<CODE>.csv` file per instrument.
//!
//! Expected header: `date,open,high,low,close,volume`, dates as `YYYY-MM-DD`.

use crate::domain::error::SwingError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{code}.csv"))
    }
}

fn source_error(code: &str, reason: impl Into<String>) -> SwingError {
    SwingError::DataSource {
        code: code.to_string(),
        reason: reason.into(),
    }
}

fn parse_price(code: &str, record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, SwingError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| source_error(code, format!("missing {name} column")))?;
    raw.trim()
        .parse()
        .map_err(|e| source_error(code, format!("invalid {name} value '{raw}': {e}")))
}

/// Vendors sometimes export volume as a float ("1234.0").
fn parse_volume(code: &str, record: &csv::StringRecord) -> Result<i64, SwingError> {
    let raw = record
        .get(5)
        .ok_or_else(|| source_error(code, "missing volume column"))?
        .trim();
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    raw.parse::<f64>()
        .map(|v| v.round() as i64)
        .map_err(|e| source_error(code, format!("invalid volume value '{raw}': {e}")))
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        let path = self.csv_path(code);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(source_error(
                    code,
                    format!("failed to read {}: {}", path.display(), e),
                ));
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| source_error(code, format!("CSV parse error: {e}")))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| source_error(code, "missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| source_error(code, format!("invalid date '{date_str}': {e}")))?;

            bars.push(OhlcvBar {
                date,
                open: parse_price(code, &record, 1, "open")?,
                high: parse_price(code, &record, 2, "high")?,
                low: parse_price(code, &record, 3, "low")?,
                close: parse_price(code, &record, 4, "close")?,
                volume: parse_volume(code, &record)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        let skip = bars.len().saturating_sub(lookback);
        Ok(bars.split_off(skip))
    }
}
