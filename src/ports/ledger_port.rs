//! Ledger storage port trait.
//!
//! Load happens once before a cycle and save once after it succeeds.

use crate::domain::error::SwingError;
use crate::domain::ledger::Ledger;

pub trait LedgerPort {
    /// The stored ledger, or an empty one if nothing has been saved yet.
    fn load(&self) -> Result<Ledger, SwingError>;

    /// Replace the stored ledger with `ledger` as a single operation.
    fn save(&self, ledger: &Ledger) -> Result<(), SwingError>;
}
