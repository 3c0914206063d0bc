//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod json_ledger_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod throttled_data_port;
pub mod universe_adapter;
