//! RSI (Relative Strength Index) over simple rolling means.
//!
//! delta[i] = close[i] - close[i-1]
//! avg_gain = mean of max(delta, 0) over the last n deltas
//! avg_loss = mean of max(-delta, 0) over the last n deltas
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//!
//! Edge policy:
//! - avg_loss == 0 and avg_gain > 0: RSI saturates at 100.
//! - avg_loss == 0 and avg_gain == 0 (flat window): undefined.
//!
//! Warmup: the first n bars are undefined (n deltas need n + 1 closes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType, into_series, undefined_series};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 || bars.len() < 2 {
        return undefined_series(bars, IndicatorType::Rsi(period));
    }

    let deltas: Vec<f64> = bars
        .windows(2)
        .map(|w| w[1].change_from(w[0].close))
        .collect();

    let mut values = Vec::with_capacity(bars.len());
    values.push(None);

    for i in 0..deltas.len() {
        if i + 1 < period {
            values.push(None);
            continue;
        }
        let window = &deltas[i + 1 - period..=i];
        let avg_gain = window.iter().map(|d| d.max(0.0)).sum::<f64>() / period as f64;
        let avg_loss = window.iter().map(|d| (-d).max(0.0)).sum::<f64>() / period as f64;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    into_series(bars, IndicatorType::Rsi(period), values)
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { Some(100.0) } else { None }
    } else {
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
