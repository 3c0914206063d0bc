//! Core domain types and logic. Nothing in here performs I/O.

pub mod ohlcv;
pub mod series;
pub mod indicator;
pub mod snapshot;
pub mod strategy;
pub mod entry;
pub mod exit;
pub mod position;
pub mod ledger;
pub mod scan;
pub mod universe;
pub mod config_validation;
pub mod error;
