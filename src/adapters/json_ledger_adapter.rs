//! JSON file ledger storage (`portfolio.json`).
//!
//! The file holds the full array of position records. Saves go to a sibling
//! temp file which is then renamed over the target, so readers never see a
//! half-written ledger.

use crate::domain::error::SwingError;
use crate::domain::ledger::Ledger;
use crate::domain::position::Position;
use crate::ports::ledger_port::LedgerPort;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonLedgerAdapter {
    path: PathBuf,
}

impl JsonLedgerAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerPort for JsonLedgerAdapter {
    fn load(&self) -> Result<Ledger, SwingError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet, starting empty");
            return Ok(Ledger::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            SwingError::storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        if content.trim().is_empty() {
            return Ok(Ledger::new());
        }
        let positions: Vec<Position> = serde_json::from_str(&content).map_err(|e| {
            SwingError::storage(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        Ledger::from_positions(positions)
    }

    fn save(&self, ledger: &Ledger) -> Result<(), SwingError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SwingError::storage)?;
        }
        let json = serde_json::to_string_pretty(ledger.positions()).map_err(SwingError::storage)?;

        let tmp = self.temp_path();
        fs::write(&tmp, json)
            .map_err(|e| SwingError::storage(format!("failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            SwingError::storage(format!("failed to replace {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), records = ledger.len(), "ledger saved");
        Ok(())
    }
}
