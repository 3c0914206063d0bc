//! Technical indicator implementations.
//!
//! - `IndicatorPoint`: one dated value, `None` during warmup
//! - `IndicatorType`: indicator kind plus window, used as a map key
//! - `IndicatorSeries`: values aligned one-to-one with the input bars
//!
//! A point carries `None` until its window has enough bars. Each indicator's
//! warmup is independent of the others.

pub mod extrema;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Sma(usize),
    VolumeSma(usize),
    RollingHigh(usize),
    RollingLow(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }
}

impl IndicatorType {
    pub fn period(&self) -> usize {
        match self {
            IndicatorType::Rsi(p)
            | IndicatorType::Sma(p)
            | IndicatorType::VolumeSma(p)
            | IndicatorType::RollingHigh(p)
            | IndicatorType::RollingLow(p) => *p,
        }
    }

    /// Number of bars required before the first defined value.
    /// RSI needs one extra bar because it works on price changes.
    pub fn bars_required(&self) -> usize {
        match self {
            IndicatorType::Rsi(p) => p + 1,
            other => other.period(),
        }
    }

    pub fn calculate(&self, bars: &[OhlcvBar]) -> IndicatorSeries {
        match *self {
            IndicatorType::Rsi(p) => rsi::calculate_rsi(bars, p),
            IndicatorType::Sma(p) => sma::calculate_sma(bars, p),
            IndicatorType::VolumeSma(p) => sma::calculate_volume_sma(bars, p),
            IndicatorType::RollingHigh(p) => extrema::calculate_rolling_high(bars, p),
            IndicatorType::RollingLow(p) => extrema::calculate_rolling_low(bars, p),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::RollingHigh(period) => write!(f, "HIGHEST_HIGH({})", period),
            IndicatorType::RollingLow(period) => write!(f, "LOWEST_LOW({})", period),
        }
    }
}

/// Compute every requested indicator once, keyed by type.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for indicator_type in types {
        out.entry(*indicator_type)
            .or_insert_with(|| indicator_type.calculate(bars));
    }
    out
}

/// Mark every bar as undefined for the given indicator.
pub(crate) fn undefined_series(bars: &[OhlcvBar], indicator_type: IndicatorType) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type,
        values: bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                value: None,
            })
            .collect(),
    }
}

/// Apply `f` to each full trailing window of `period` values.
pub(crate) fn trailing<F>(values: &[f64], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    (0..values.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                None
            } else {
                Some(f(&values[i + 1 - period..=i]))
            }
        })
        .collect()
}

pub(crate) fn into_series(
    bars: &[OhlcvBar],
    indicator_type: IndicatorType,
    values: Vec<Option<f64>>,
) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type,
        values: bars
            .iter()
            .zip(values)
            .map(|(b, value)| IndicatorPoint {
                date: b.date,
                value,
            })
            .collect(),
    }
}
