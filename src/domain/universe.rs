//! Instrument universe: the ordered, duplicate-free list of codes to scan.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub codes: Vec<String>,
}

impl Universe {
    pub fn new(codes: Vec<String>) -> Self {
        Universe { codes }
    }

    pub fn count(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

/// Strict parse of a comma-separated code list from configuration.
pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

/// Lenient normalisation of raw symbols from an exchange list: trims,
/// drops blanks, keeps the first occurrence of each symbol and appends
/// `suffix` (e.g. ".NS").
pub fn normalize_symbols<I, S>(raw: I, suffix: &str) -> Universe
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let codes = raw
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(format!("{trimmed}{suffix}"))
            }
        })
        .filter(|code| seen.insert(code.clone()))
        .collect();
    Universe { codes }
}
