#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
pub use swingscan::domain::ohlcv::OhlcvBar;
use swingscan::domain::error::SwingError;
use swingscan::ports::data_port::DataPort;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, code: &str, lookback: usize) -> Result<Vec<OhlcvBar>, SwingError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(SwingError::DataSource {
                code: code.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(code).cloned().unwrap_or_default();
        let skip = bars.len().saturating_sub(lookback);
        Ok(bars[skip..].to_vec())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(18, 0, 0).unwrap()
}

/// One bar per calendar day from 2024-01-01, open == close, volume 1000.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

/// 200 bars that pass every entry rule on the last bar:
/// a long rise (trend), a sharp sell-off (oversold), then a small bullish
/// bar on 5x volume. Last close is 214.5.
pub fn oversold_bounce_bars() -> Vec<OhlcvBar> {
    let mut closes: Vec<f64> = (0..171).map(|i| 100.0 + i as f64).collect();
    for _ in 0..28 {
        let last = *closes.last().unwrap();
        closes.push(last - 2.0);
    }
    closes.push(214.5);

    let mut bars = bars_from_closes(&closes);
    let last = bars.last_mut().unwrap();
    last.open = 214.2;
    last.volume = 5000;
    bars
}

/// Short series whose last close is `close`.
pub fn bars_ending_at(close: f64) -> Vec<OhlcvBar> {
    bars_from_closes(&[100.0, 99.0, 98.0, 97.0, close])
}

pub fn write_bars_csv(dir: &Path, code: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    fs::write(dir.join(format!("{code}.csv")), content).unwrap();
}
