//! Entry rule evaluation.
//!
//! A BUY requires all four checks to hold on the most recent bar:
//! 1. Oversold: RSI(medium) < 30, RSI(short) < 35, RSI(long) < 40
//! 2. Trend: close > SMA(long) OR SMA(short) > SMA(long)
//! 3. Volume: volume > multiple x average volume
//! 4. Candle: close > open AND close > previous close
//!
//! All comparisons are strict. An undefined indicator fails its check.
//! Fewer than `min_history` bars yields `DecisionKind::None` with no evidence.

use serde::Serialize;
use std::fmt;

use super::series::EnrichedSeries;
use super::strategy::StrategyParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    Buy,
    Sell,
    None,
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionKind::Buy => f.write_str("BUY"),
            DecisionKind::Sell => f.write_str("SELL"),
            DecisionKind::None => f.write_str("NONE"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryChecks {
    pub oversold: bool,
    pub trend: bool,
    pub volume: bool,
    pub candle: bool,
}

impl EntryChecks {
    pub fn all(&self) -> bool {
        self.oversold && self.trend && self.volume && self.candle
    }
}

/// Values the decision was made on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryEvidence {
    pub price: f64,
    pub rsi_medium: Option<f64>,
    pub volume_multiple: Option<f64>,
    pub checks: EntryChecks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryDecision {
    pub code: String,
    pub kind: DecisionKind,
    pub evidence: Option<EntryEvidence>,
}

impl EntryDecision {
    pub fn is_buy(&self) -> bool {
        self.kind == DecisionKind::Buy
    }

    fn insufficient(code: &str) -> Self {
        EntryDecision {
            code: code.to_string(),
            kind: DecisionKind::None,
            evidence: None,
        }
    }
}

fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

fn above(value: Option<f64>, threshold: Option<f64>) -> bool {
    matches!((value, threshold), (Some(v), Some(t)) if v > t)
}

pub fn evaluate_entry(series: &EnrichedSeries, params: &StrategyParams) -> EntryDecision {
    if series.len() < params.min_history.max(2) {
        return EntryDecision::insufficient(&series.code);
    }
    let (Some((bar, snap)), Some(prev)) = (series.latest(), series.previous_bar()) else {
        return EntryDecision::insufficient(&series.code);
    };

    let volume = bar.volume as f64;
    let checks = EntryChecks {
        oversold: below(snap.rsi_medium, params.rsi_medium_max)
            && below(snap.rsi_short, params.rsi_short_max)
            && below(snap.rsi_long, params.rsi_long_max),
        trend: above(Some(bar.close), snap.ma_long) || above(snap.ma_short, snap.ma_long),
        volume: above(Some(volume), snap.volume_avg.map(|avg| avg * params.volume_multiple)),
        candle: bar.is_bullish() && bar.close > prev.close,
    };

    let volume_multiple = snap
        .volume_avg
        .filter(|avg| *avg > 0.0)
        .map(|avg| volume / avg);

    EntryDecision {
        code: series.code.clone(),
        kind: if checks.all() {
            DecisionKind::Buy
        } else {
            DecisionKind::None
        },
        evidence: Some(EntryEvidence {
            price: bar.close,
            rsi_medium: snap.rsi_medium,
            volume_multiple,
            checks,
        }),
    }
}
