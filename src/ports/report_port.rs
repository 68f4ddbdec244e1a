//! Report generation port trait.

use crate::domain::analysis::TickerOutcome;
use crate::domain::error::FlowcrossError;

/// Port for writing batch analysis reports.
pub trait ReportPort {
    fn write(&self, outcomes: &[TickerOutcome], output_path: &str) -> Result<(), FlowcrossError>;
}
