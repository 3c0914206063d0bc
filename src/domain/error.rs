//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for swingscan.
///
/// "Not enough history" and "no signal" are never errors; they are ordinary
/// decision values produced by the evaluators.
#[derive(Debug, thiserror::Error)]
pub enum SwingError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("data source error for {code}: {reason}")]
    DataSource { code: String, reason: String },

    #[error("malformed series for {code}: {reason}")]
    MalformedSeries { code: String, reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("ledger invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SwingError {
    pub fn storage(reason: impl std::fmt::Display) -> Self {
        SwingError::Storage {
            reason: reason.to_string(),
        }
    }

    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SwingError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config_missing(section: &str, key: &str) -> Self {
        SwingError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            SwingError::Io(_) => 1,
            SwingError::ConfigParse { .. }
            | SwingError::ConfigMissing { .. }
            | SwingError::ConfigInvalid { .. } => 2,
            SwingError::Storage { .. } => 3,
            SwingError::Universe(_) => 4,
            SwingError::DataSource { .. } | SwingError::MalformedSeries { .. } => 5,
            SwingError::InvariantViolation { .. } => 6,
        }
    }
}

impl From<&SwingError> for std::process::ExitCode {
    fn from(err: &SwingError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
