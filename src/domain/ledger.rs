//! Position ledger: the append-only record of every position ever opened.
//!
//! The ledger is the only stateful piece of the core. Records are never
//! removed or reordered; the only in-place mutation is OPEN -> CLOSED.

use chrono::NaiveDateTime;

use super::error::SwingError;
use super::position::{ExitReason, Position};
use super::strategy::StrategyParams;

/// Stable handle to a ledger record (its position in creation order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionId(pub usize);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    positions: Vec<Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Rebuild a ledger from storage, re-checking every record.
    pub fn from_positions(positions: Vec<Position>) -> Result<Self, SwingError> {
        for position in &positions {
            position.check_invariants()?;
        }
        Ok(Ledger { positions })
    }

    /// Append a new OPEN position with stop/target derived from `params`.
    /// Several open positions for the same code are allowed.
    pub fn open(
        &mut self,
        code: &str,
        price: f64,
        timestamp: NaiveDateTime,
        params: &StrategyParams,
    ) -> Result<PositionId, SwingError> {
        let position = Position::new(
            code,
            price,
            timestamp,
            params.stop_loss_for(price),
            params.target_for(price),
        )?;
        self.positions.push(position);
        Ok(PositionId(self.positions.len() - 1))
    }

    /// Close an OPEN position. Closing an unknown or already CLOSED
    /// position is an invariant violation.
    pub fn close(
        &mut self,
        id: PositionId,
        exit_price: f64,
        reason: ExitReason,
        timestamp: NaiveDateTime,
    ) -> Result<(), SwingError> {
        let len = self.positions.len();
        let position = self
            .positions
            .get_mut(id.0)
            .ok_or_else(|| SwingError::InvariantViolation {
                reason: format!("position #{} does not exist (ledger has {})", id.0, len),
            })?;
        position.close(exit_price, reason, timestamp)
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(id.0)
    }

    /// OPEN positions in ledger order.
    pub fn open_positions(&self) -> Vec<(PositionId, &Position)> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_open())
            .map(|(i, p)| (PositionId(i), p))
            .collect()
    }

    pub fn closed_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.is_open())
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_open()).count()
    }
}
