//! Rule-set parameters for the swing strategy.
//!
//! Defaults reproduce the production rule set: RSI 7/14/30 oversold gates,
//! SMA 50/200 trend filter, 20-bar volume spike, 30-bar swing high exit,
//! 7% stop and 10% target.

use crate::domain::indicator::IndicatorType;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub rsi_short_period: usize,
    pub rsi_medium_period: usize,
    pub rsi_long_period: usize,
    pub rsi_short_max: f64,
    pub rsi_medium_max: f64,
    pub rsi_long_max: f64,
    pub ma_short_period: usize,
    pub ma_long_period: usize,
    pub volume_period: usize,
    pub volume_multiple: f64,
    pub swing_high_period: usize,
    pub swing_low_period: usize,
    pub min_history: usize,
    pub stop_loss_factor: f64,
    pub target_factor: f64,
    pub rsi_exit_level: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            rsi_short_period: 7,
            rsi_medium_period: 14,
            rsi_long_period: 30,
            rsi_short_max: 35.0,
            rsi_medium_max: 30.0,
            rsi_long_max: 40.0,
            ma_short_period: 50,
            ma_long_period: 200,
            volume_period: 20,
            volume_multiple: 2.5,
            swing_high_period: 30,
            swing_low_period: 20,
            min_history: 200,
            stop_loss_factor: 0.93,
            target_factor: 1.10,
            rsi_exit_level: 50.0,
        }
    }
}

impl StrategyParams {
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Rsi(self.rsi_short_period),
            IndicatorType::Rsi(self.rsi_medium_period),
            IndicatorType::Rsi(self.rsi_long_period),
            IndicatorType::Sma(self.ma_short_period),
            IndicatorType::Sma(self.ma_long_period),
            IndicatorType::VolumeSma(self.volume_period),
            IndicatorType::RollingHigh(self.swing_high_period),
            IndicatorType::RollingLow(self.swing_low_period),
        ]
    }

    /// Bars needed before every indicator is defined.
    pub fn longest_window(&self) -> usize {
        self.indicator_types()
            .iter()
            .map(IndicatorType::bars_required)
            .max()
            .unwrap_or(0)
    }

    pub fn stop_loss_for(&self, entry_price: f64) -> f64 {
        entry_price * self.stop_loss_factor
    }

    pub fn target_for(&self, entry_price: f64) -> f64 {
        entry_price * self.target_factor
    }
}
