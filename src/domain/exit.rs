//! Exit rule evaluation for an open position.
//!
//! Rules run in fixed priority on the latest bar, first match wins:
//! stop loss, target, RSI normalisation, swing-high breakout.

use super::position::{ExitReason, Position};
use super::series::EnrichedSeries;
use super::snapshot::IndicatorSnapshot;
use super::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitOutcome {
    /// No bars were available; retry next cycle.
    NoData,
    /// Evaluated and no rule fired.
    Hold { price: f64 },
    Exit { reason: ExitReason, price: f64 },
}

impl ExitOutcome {
    pub fn should_exit(&self) -> bool {
        matches!(self, ExitOutcome::Exit { .. })
    }

    pub fn reason(&self) -> Option<ExitReason> {
        match self {
            ExitOutcome::Exit { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Latest close, or 0 when no data was available.
    pub fn observed_price(&self) -> f64 {
        match self {
            ExitOutcome::NoData => 0.0,
            ExitOutcome::Hold { price } | ExitOutcome::Exit { price, .. } => *price,
        }
    }
}

pub fn classify_exit(
    position: &Position,
    price: f64,
    snap: &IndicatorSnapshot,
    params: &StrategyParams,
) -> Option<ExitReason> {
    if position.should_stop_loss(price) {
        Some(ExitReason::StopLoss)
    } else if position.should_take_profit(price) {
        Some(ExitReason::TargetHit)
    } else if snap.rsi_medium.is_some_and(|rsi| rsi > params.rsi_exit_level) {
        Some(ExitReason::RsiExit)
    } else if snap.swing_high.is_some_and(|high| price >= high) {
        Some(ExitReason::SwingHighExit)
    } else {
        None
    }
}

pub fn evaluate_exit(
    position: &Position,
    series: &EnrichedSeries,
    params: &StrategyParams,
) -> ExitOutcome {
    let Some((bar, snap)) = series.latest() else {
        return ExitOutcome::NoData;
    };
    match classify_exit(position, bar.close, snap, params) {
        Some(reason) => ExitOutcome::Exit {
            reason,
            price: bar.close,
        },
        None => ExitOutcome::Hold { price: bar.close },
    }
}
