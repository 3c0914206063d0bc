//! Rolling extrema: highest high and lowest low over a trailing window.
//!
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, into_series, trailing};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rolling_high(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    into_series(
        bars,
        IndicatorType::RollingHigh(period),
        trailing(&highs, period, |w| w.iter().copied().fold(f64::MIN, f64::max)),
    )
}

pub fn calculate_rolling_low(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    into_series(
        bars,
        IndicatorType::RollingLow(period),
        trailing(&lows, period, |w| w.iter().copied().fold(f64::MAX, f64::min)),
    )
}
