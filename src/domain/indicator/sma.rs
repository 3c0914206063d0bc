//! Simple moving averages of close price and of volume.
//!
//! SMA(n)[i] = sum(x[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType, into_series, trailing};
use crate::domain::ohlcv::OhlcvBar;

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    into_series(bars, IndicatorType::Sma(period), trailing(&closes, period, mean))
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    into_series(
        bars,
        IndicatorType::VolumeSma(period),
        trailing(&volumes, period, mean),
    )
}
