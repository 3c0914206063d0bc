//! Per-bar indicator snapshots: the output of the indicator engine.

use crate::domain::indicator::{IndicatorType, compute_indicators};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::strategy::StrategyParams;
use serde::Serialize;

/// Derived values for one bar. `None` means the window is not yet full
/// (or, for RSI, that the window saw no price movement at all).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub rsi_short: Option<f64>,
    pub rsi_medium: Option<f64>,
    pub rsi_long: Option<f64>,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub volume_avg: Option<f64>,
    pub swing_high: Option<f64>,
    pub swing_low: Option<f64>,
}

/// Pure transform: one snapshot per bar, same order as `bars`.
pub fn build_snapshots(bars: &[OhlcvBar], params: &StrategyParams) -> Vec<IndicatorSnapshot> {
    let series = compute_indicators(bars, &params.indicator_types());
    let at = |t: IndicatorType, i: usize| series.get(&t).and_then(|s| s.value_at(i));

    (0..bars.len())
        .map(|i| IndicatorSnapshot {
            rsi_short: at(IndicatorType::Rsi(params.rsi_short_period), i),
            rsi_medium: at(IndicatorType::Rsi(params.rsi_medium_period), i),
            rsi_long: at(IndicatorType::Rsi(params.rsi_long_period), i),
            ma_short: at(IndicatorType::Sma(params.ma_short_period), i),
            ma_long: at(IndicatorType::Sma(params.ma_long_period), i),
            volume_avg: at(IndicatorType::VolumeSma(params.volume_period), i),
            swing_high: at(IndicatorType::RollingHigh(params.swing_high_period), i),
            swing_low: at(IndicatorType::RollingLow(params.swing_low_period), i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rising_bars(count: usize) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..count)
            .map(|i| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: 100.0 + i as f64,
                high: 101.0 + i as f64,
                low: 99.0 + i as f64,
                close: 100.0 + i as f64,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn availability_is_per_indicator() {
        let bars = rising_bars(60);
        let snaps = build_snapshots(&bars, &StrategyParams::default());

        assert_eq!(snaps.len(), 60);
        let last = snaps[59];
        assert!(last.rsi_short.is_some());
        assert!(last.rsi_long.is_some());
        assert!(last.ma_short.is_some());
        assert!(last.ma_long.is_none());
        assert!(last.volume_avg.is_some());
    }

    #[test]
    fn first_bar_has_nothing_defined() {
        let snaps = build_snapshots(&rising_bars(5), &StrategyParams::default());
        assert_eq!(snaps[0], IndicatorSnapshot::default());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(build_snapshots(&[], &StrategyParams::default()).is_empty());
    }

    #[test]
    fn full_history_defines_everything() {
        let snaps = build_snapshots(&rising_bars(200), &StrategyParams::default());
        let last = snaps[199];
        assert_eq!(last.rsi_medium, Some(100.0));
        assert_eq!(last.ma_long, Some(100.0 + 199.0 / 2.0));
        assert_eq!(last.swing_high, Some(300.0));
        assert_eq!(last.swing_low, Some(99.0 + 180.0));
        assert_eq!(last.volume_avg, Some(1000.0));
    }
}
