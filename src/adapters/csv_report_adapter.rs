//! CSV report adapter implementing ReportPort.
//!
//! One row per ticker outcome, in batch order. Metric columns are empty for
//! tickers that were not displayed.

use std::fs;
use std::path::Path;

use crate::domain::analysis::TickerOutcome;
use crate::domain::error::FlowcrossError;
use crate::ports::report_port::ReportPort;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    ticker: &'a str,
    status: &'static str,
    reason: Option<String>,
    last_date: Option<String>,
    verify_days: Option<usize>,
    total_signals: Option<usize>,
    success_count: Option<usize>,
    fail_count: Option<usize>,
    success_rate: Option<f64>,
    avg_gain: Option<f64>,
    max_gain: Option<f64>,
    avg_loss: Option<f64>,
    max_loss: Option<f64>,
    avg_return_at_horizon: Option<f64>,
    recent_signal: Option<bool>,
}

impl<'a> ReportRow<'a> {
    fn skipped(ticker: &'a str, status: &'static str, reason: String) -> Self {
        Self {
            ticker,
            status,
            reason: Some(reason),
            last_date: None,
            verify_days: None,
            total_signals: None,
            success_count: None,
            fail_count: None,
            success_rate: None,
            avg_gain: None,
            max_gain: None,
            avg_loss: None,
            max_loss: None,
            avg_return_at_horizon: None,
            recent_signal: None,
        }
    }

    fn from_outcome(outcome: &'a TickerOutcome) -> Self {
        match outcome {
            TickerOutcome::Displayed(analysis) => {
                let p = &analysis.performance;
                Self {
                    ticker: &analysis.ticker,
                    status: "displayed",
                    reason: None,
                    last_date: analysis.series.last_date().map(|d| d.to_string()),
                    verify_days: Some(p.verify_days),
                    total_signals: Some(p.total_signals),
                    success_count: Some(p.success_count),
                    fail_count: Some(p.fail_count),
                    success_rate: Some(round2(p.success_rate)),
                    avg_gain: Some(round2(p.avg_gain)),
                    max_gain: Some(round2(p.max_gain)),
                    avg_loss: Some(round2(p.avg_loss)),
                    max_loss: Some(round2(p.max_loss)),
                    avg_return_at_horizon: Some(round2(p.avg_return_at_horizon)),
                    recent_signal: Some(analysis.series.has_recent_signal()),
                }
            }
            TickerOutcome::NotQualified { ticker, reason } => {
                Self::skipped(ticker, "not_qualified", reason.to_string())
            }
            TickerOutcome::Failed { ticker, error } => {
                Self::skipped(ticker, "failed", error.to_string())
            }
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn report_error(e: impl std::fmt::Display) -> FlowcrossError {
    FlowcrossError::Report {
        reason: e.to_string(),
    }
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, outcomes: &[TickerOutcome], output_path: &str) -> Result<(), FlowcrossError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(FlowcrossError::Io)?;
        }

        let mut wtr = csv::Writer::from_path(path).map_err(report_error)?;
        for outcome in outcomes {
            wtr.serialize(ReportRow::from_outcome(outcome))
                .map_err(report_error)?;
        }
        wtr.flush().map_err(FlowcrossError::Io)?;
        Ok(())
    }
}
