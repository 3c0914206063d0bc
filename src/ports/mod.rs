//! Port traits for the external collaborators of a scan cycle.

pub mod config_port;
pub mod data_port;
pub mod ledger_port;
pub mod report_port;
pub mod universe_port;
