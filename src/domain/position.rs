//! Position records and their OPEN -> CLOSED lifecycle.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::SwingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed,
}

/// Why a position was closed. Variants are listed in evaluation priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopLoss,
    TargetHit,
    RsiExit,
    SwingHighExit,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::TargetHit => "TARGET_HIT",
            ExitReason::RsiExit => "RSI_EXIT",
            ExitReason::SwingHighExit => "SWING_HIGH_EXIT",
        };
        f.write_str(s)
    }
}

impl FromStr for ExitReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOP_LOSS" => Ok(ExitReason::StopLoss),
            "TARGET_HIT" => Ok(ExitReason::TargetHit),
            "RSI_EXIT" => Ok(ExitReason::RsiExit),
            "SWING_HIGH_EXIT" => Ok(ExitReason::SwingHighExit),
            other => Err(format!("unknown exit reason: {other}")),
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionStatus::Open => f.write_str("OPEN"),
            PositionStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub code: String,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub stop_loss: f64,
    pub target_price: f64,
    pub status: PositionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_reason: Option<ExitReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_time: Option<NaiveDateTime>,
}

impl Position {
    /// A fresh OPEN position with precomputed stop and target.
    pub fn new(
        code: impl Into<String>,
        entry_price: f64,
        entry_time: NaiveDateTime,
        stop_loss: f64,
        target_price: f64,
    ) -> Result<Self, SwingError> {
        let position = Position {
            code: code.into(),
            entry_price,
            entry_time,
            stop_loss,
            target_price,
            status: PositionStatus::Open,
            exit_price: None,
            exit_reason: None,
            exit_time: None,
        };
        position.check_invariants()?;
        Ok(position)
    }

    /// stop_loss < entry_price < target_price, and exit fields present
    /// exactly when the position is CLOSED.
    pub fn check_invariants(&self) -> Result<(), SwingError> {
        if !(self.stop_loss < self.entry_price && self.entry_price < self.target_price) {
            return Err(SwingError::InvariantViolation {
                reason: format!(
                    "{}: expected stop_loss < entry < target, got {} / {} / {}",
                    self.code, self.stop_loss, self.entry_price, self.target_price
                ),
            });
        }
        let has_exit = self.exit_price.is_some() && self.exit_reason.is_some();
        let has_any_exit = self.exit_price.is_some() || self.exit_reason.is_some();
        match self.status {
            PositionStatus::Open if has_any_exit => Err(SwingError::InvariantViolation {
                reason: format!("{}: OPEN position carries exit fields", self.code),
            }),
            PositionStatus::Closed if !has_exit => Err(SwingError::InvariantViolation {
                reason: format!("{}: CLOSED position is missing exit fields", self.code),
            }),
            _ => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        price >= self.target_price
    }

    /// Transition OPEN -> CLOSED. Closing twice is a defect.
    pub fn close(
        &mut self,
        exit_price: f64,
        reason: ExitReason,
        exit_time: NaiveDateTime,
    ) -> Result<(), SwingError> {
        if self.status == PositionStatus::Closed {
            return Err(SwingError::InvariantViolation {
                reason: format!(
                    "{} opened at {} is already CLOSED ({})",
                    self.code,
                    self.entry_time,
                    self.exit_reason.map(|r| r.to_string()).unwrap_or_default()
                ),
            });
        }
        self.status = PositionStatus::Closed;
        self.exit_price = Some(exit_price);
        self.exit_reason = Some(reason);
        self.exit_time = Some(exit_time);
        Ok(())
    }

    /// (exit - entry) / entry, for closed positions.
    pub fn realized_return(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| (exit - self.entry_price) / self.entry_price)
    }

    pub fn unrealized_return(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }
}
