//! Report sink port trait.

use crate::domain::error::SwingError;
use crate::domain::scan::CycleReport;

/// Port for writing the per-cycle output tables.
pub trait ReportPort {
    fn write(&self, report: &CycleReport) -> Result<(), SwingError>;
}
