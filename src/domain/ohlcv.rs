//! Daily OHLCV bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// close > open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// close - prev_close
    pub fn change_from(&self, prev_close: f64) -> f64 {
        self.close - prev_close
    }
}
