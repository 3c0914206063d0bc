//! Universe sources: an exchange symbol list on disk, or codes in the config.

use crate::domain::error::SwingError;
use crate::domain::universe::{Universe, normalize_symbols, parse_codes};
use crate::ports::config_port::ConfigPort;
use crate::ports::universe_port::UniversePort;
use std::path::PathBuf;

const SYMBOL_COLUMN: &str = "Symbol";

/// Reads the `Symbol` column of an exchange equity list and appends `suffix`.
pub struct CsvUniverseAdapter {
    path: PathBuf,
    suffix: String,
}

impl CsvUniverseAdapter {
    pub fn new(path: PathBuf, suffix: impl Into<String>) -> Self {
        Self {
            path,
            suffix: suffix.into(),
        }
    }
}

impl UniversePort for CsvUniverseAdapter {
    fn load_universe(&self) -> Result<Universe, SwingError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)
            .map_err(|e| {
                SwingError::config_invalid(
                    "universe",
                    "csv_path",
                    format!("cannot read {}: {}", self.path.display(), e),
                )
            })?;

        let headers = rdr.headers().map_err(|e| {
            SwingError::config_invalid("universe", "csv_path", format!("bad header row: {e}"))
        })?;
        let idx = headers
            .iter()
            .position(|h| h == SYMBOL_COLUMN)
            .ok_or_else(|| {
                SwingError::config_invalid(
                    "universe",
                    "csv_path",
                    format!("{} has no '{SYMBOL_COLUMN}' column", self.path.display()),
                )
            })?;

        let mut symbols = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| {
                SwingError::config_invalid("universe", "csv_path", format!("CSV parse error: {e}"))
            })?;
            if let Some(symbol) = record.get(idx) {
                symbols.push(symbol.to_string());
            }
        }

        Ok(normalize_symbols(symbols, &self.suffix))
    }
}

/// Explicit `[universe] codes = A,B,C` list, parsed strictly.
pub struct ConfigUniverse {
    codes: String,
}

impl ConfigUniverse {
    pub fn new(codes: impl Into<String>) -> Self {
        Self {
            codes: codes.into(),
        }
    }
}

impl UniversePort for ConfigUniverse {
    fn load_universe(&self) -> Result<Universe, SwingError> {
        Ok(Universe::new(parse_codes(&self.codes)?))
    }
}

/// Pick the universe source from `[universe]`. A symbol file wins over codes.
pub fn universe_from_config(config: &dyn ConfigPort) -> Result<Box<dyn UniversePort>, SwingError> {
    let non_empty = |key: &str| {
        config
            .get_string("universe", key)
            .filter(|v| !v.trim().is_empty())
    };

    if let Some(path) = non_empty("csv_path") {
        let suffix = config.get_string("universe", "suffix").unwrap_or_default();
        return Ok(Box::new(CsvUniverseAdapter::new(
            PathBuf::from(path.trim()),
            suffix.trim(),
        )));
    }
    match non_empty("codes") {
        Some(codes) => Ok(Box::new(ConfigUniverse::new(codes))),
        None => Err(SwingError::config_missing("universe", "codes")),
    }
}
