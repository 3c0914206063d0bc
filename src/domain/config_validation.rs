//! Configuration loading and validation.
//!
//! Everything is read through [`ConfigPort`] and checked before any data is
//! fetched, so a bad rule set never reaches the scan.

use crate::domain::error::SwingError;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;

const STRATEGY: &str = "strategy";
const DATA: &str = "data";

/// Bar retrieval settings from `[data]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSettings {
    pub lookback_bars: usize,
    pub attempts: usize,
    pub delay_ms: u64,
}

/// Read `[strategy]`, falling back to the default rule set key by key.
pub fn load_strategy_params(config: &dyn ConfigPort) -> Result<StrategyParams, SwingError> {
    let d = StrategyParams::default();
    let params = StrategyParams {
        rsi_short_period: config.get_usize(STRATEGY, "rsi_short_period", d.rsi_short_period),
        rsi_medium_period: config.get_usize(STRATEGY, "rsi_medium_period", d.rsi_medium_period),
        rsi_long_period: config.get_usize(STRATEGY, "rsi_long_period", d.rsi_long_period),
        rsi_short_max: config.get_double(STRATEGY, "rsi_short_max", d.rsi_short_max),
        rsi_medium_max: config.get_double(STRATEGY, "rsi_medium_max", d.rsi_medium_max),
        rsi_long_max: config.get_double(STRATEGY, "rsi_long_max", d.rsi_long_max),
        ma_short_period: config.get_usize(STRATEGY, "ma_short_period", d.ma_short_period),
        ma_long_period: config.get_usize(STRATEGY, "ma_long_period", d.ma_long_period),
        volume_period: config.get_usize(STRATEGY, "volume_period", d.volume_period),
        volume_multiple: config.get_double(STRATEGY, "volume_multiple", d.volume_multiple),
        swing_high_period: config.get_usize(STRATEGY, "swing_high_period", d.swing_high_period),
        swing_low_period: config.get_usize(STRATEGY, "swing_low_period", d.swing_low_period),
        min_history: config.get_usize(STRATEGY, "min_history", d.min_history),
        stop_loss_factor: config.get_double(STRATEGY, "stop_loss_factor", d.stop_loss_factor),
        target_factor: config.get_double(STRATEGY, "target_factor", d.target_factor),
        rsi_exit_level: config.get_double(STRATEGY, "rsi_exit_level", d.rsi_exit_level),
    };
    validate_strategy_params(&params)?;
    Ok(params)
}

pub fn validate_strategy_params(params: &StrategyParams) -> Result<(), SwingError> {
    let periods = [
        ("rsi_short_period", params.rsi_short_period),
        ("rsi_medium_period", params.rsi_medium_period),
        ("rsi_long_period", params.rsi_long_period),
        ("ma_short_period", params.ma_short_period),
        ("ma_long_period", params.ma_long_period),
        ("volume_period", params.volume_period),
        ("swing_high_period", params.swing_high_period),
        ("swing_low_period", params.swing_low_period),
    ];
    for (key, period) in periods {
        if period == 0 {
            return Err(SwingError::config_invalid(
                STRATEGY,
                key,
                "period must be at least 1",
            ));
        }
    }

    let levels = [
        ("rsi_short_max", params.rsi_short_max),
        ("rsi_medium_max", params.rsi_medium_max),
        ("rsi_long_max", params.rsi_long_max),
        ("rsi_exit_level", params.rsi_exit_level),
    ];
    for (key, level) in levels {
        if !(level > 0.0 && level < 100.0) {
            return Err(SwingError::config_invalid(
                STRATEGY,
                key,
                "oscillator level must be between 0 and 100",
            ));
        }
    }

    if !(params.volume_multiple > 0.0) {
        return Err(SwingError::config_invalid(
            STRATEGY,
            "volume_multiple",
            "volume_multiple must be positive",
        ));
    }
    if !(params.stop_loss_factor > 0.0 && params.stop_loss_factor < 1.0) {
        return Err(SwingError::config_invalid(
            STRATEGY,
            "stop_loss_factor",
            "stop_loss_factor must be between 0 and 1",
        ));
    }
    if !(params.target_factor > 1.0) {
        return Err(SwingError::config_invalid(
            STRATEGY,
            "target_factor",
            "target_factor must be greater than 1",
        ));
    }

    let longest = params.longest_window();
    if params.min_history < longest {
        return Err(SwingError::config_invalid(
            STRATEGY,
            "min_history",
            format!("min_history must cover the longest indicator window ({longest} bars)"),
        ));
    }
    Ok(())
}

/// Read `[data]`. The lookback must be able to satisfy `min_history`.
pub fn load_data_settings(
    config: &dyn ConfigPort,
    params: &StrategyParams,
) -> Result<DataSettings, SwingError> {
    let lookback_bars = config.get_usize(DATA, "lookback_bars", 260);
    if lookback_bars < params.min_history {
        return Err(SwingError::config_invalid(
            DATA,
            "lookback_bars",
            format!(
                "lookback_bars must be at least min_history ({})",
                params.min_history
            ),
        ));
    }

    let attempts = config.get_usize(DATA, "attempts", 2);
    if attempts == 0 {
        return Err(SwingError::config_invalid(
            DATA,
            "attempts",
            "attempts must be at least 1",
        ));
    }

    let delay_ms = config.get_int(DATA, "delay_ms", 500);
    if delay_ms < 0 {
        return Err(SwingError::config_invalid(
            DATA,
            "delay_ms",
            "delay_ms must be non-negative",
        ));
    }

    Ok(DataSettings {
        lookback_bars,
        attempts,
        delay_ms: delay_ms as u64,
    })
}

/// `[universe]` needs either a symbol file or an explicit code list.
pub fn validate_universe_config(config: &dyn ConfigPort) -> Result<(), SwingError> {
    let has = |key: &str| {
        config
            .get_string("universe", key)
            .is_some_and(|v| !v.trim().is_empty())
    };
    if has("csv_path") || has("codes") {
        Ok(())
    } else {
        Err(SwingError::config_missing("universe", "codes"))
    }
}
