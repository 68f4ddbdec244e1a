//! Configuration validation.
//!
//! Validates every `[analysis]` and `[filter]` field before a run. The
//! parsing helpers here are also what the CLI uses to build the
//! `AnalysisConfig`, so a config that validates always builds.

use crate::domain::analysis::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::daily_record::DEFAULT_REPORTING_UNIT;
use crate::domain::error::FlowcrossError;
use crate::domain::performance::{DEFAULT_VERIFY_DAYS, MAX_VERIFY_DAYS, MIN_VERIFY_DAYS};
use crate::domain::qualification::ValueRange;
use crate::domain::signal::{DEFAULT_FLOW_THRESHOLD, DEFAULT_FLOW_WINDOW};
use crate::domain::universe::{parse_market_filter, parse_tickers};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const ANALYSIS: &str = "analysis";
pub const FILTER: &str = "filter";

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    validate_data_dir(config)?;
    validate_dates(config)?;
    read_windows(config)?;
    read_flow_threshold(config)?;
    read_verify_days(config)?;
    read_reporting_unit(config)?;
    validate_market(config)?;
    validate_tickers(config)?;
    Ok(())
}

pub fn validate_filter_config(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    read_range(config, "turnover_min", "turnover_max")?;
    read_range(config, "market_cap_min", "market_cap_max")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> FlowcrossError {
    FlowcrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Non-blank string value, or `None`.
fn non_blank(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Read an optional `YYYY-MM-DD` date from `[analysis]`.
pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, FlowcrossError> {
    match non_blank(config, ANALYSIS, key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    ANALYSIS,
                    key,
                    format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

/// Read a `[filter]` range. Blank or missing bounds are open.
pub fn read_range(
    config: &dyn ConfigPort,
    min_key: &str,
    max_key: &str,
) -> Result<ValueRange, FlowcrossError> {
    let min = read_bound(config, min_key)?;
    let max = read_bound(config, max_key)?;

    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(invalid(
                FILTER,
                min_key,
                format!("{} must not exceed {}", min_key, max_key),
            ));
        }
    }
    Ok(ValueRange { min, max })
}

fn read_bound(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, FlowcrossError> {
    let Some(raw) = non_blank(config, FILTER, key) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(invalid(FILTER, key, format!("{:?} is not a number", raw))),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    match non_blank(config, ANALYSIS, "data_dir") {
        Some(_) => Ok(()),
        None => Err(FlowcrossError::ConfigMissing {
            section: ANALYSIS.to_string(),
            key: "data_dir".to_string(),
        }),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    let start_date = parse_optional_date(config, "start_date")?;
    let end_date = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(invalid(
                ANALYSIS,
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// Read an integer from `[analysis]`, falling back to `default` when blank.
fn read_int(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, FlowcrossError> {
    match non_blank(config, ANALYSIS, key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| invalid(ANALYSIS, key, format!("{:?} is not an integer", raw))),
    }
}

/// Read a finite float from `[analysis]`, falling back to `default` when blank.
fn read_double(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, FlowcrossError> {
    let Some(raw) = non_blank(config, ANALYSIS, key) else {
        return Ok(default);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(ANALYSIS, key, format!("{:?} is not a number", raw))),
    }
}

/// Moving-average and flow windows as `(short, long, flow)`.
///
/// Each must be at least 1 and `short < long`.
pub fn read_windows(config: &dyn ConfigPort) -> Result<(usize, usize, usize), FlowcrossError> {
    let mut values = [0usize; 3];
    for (slot, (key, default)) in values.iter_mut().zip([
        ("short_window", DEFAULT_SHORT_WINDOW),
        ("long_window", DEFAULT_LONG_WINDOW),
        ("flow_window", DEFAULT_FLOW_WINDOW),
    ]) {
        let value = read_int(config, key, default as i64)?;
        *slot = usize::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .ok_or_else(|| invalid(ANALYSIS, key, format!("{} must be at least 1", key)))?;
    }

    let [short, long, flow] = values;
    if short >= long {
        return Err(invalid(
            ANALYSIS,
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    Ok((short, long, flow))
}

pub fn read_flow_threshold(config: &dyn ConfigPort) -> Result<f64, FlowcrossError> {
    read_double(config, "flow_threshold", DEFAULT_FLOW_THRESHOLD)
}

pub fn read_verify_days(config: &dyn ConfigPort) -> Result<usize, FlowcrossError> {
    let value = read_int(config, "verify_days", DEFAULT_VERIFY_DAYS as i64)?;
    usize::try_from(value)
        .ok()
        .filter(|v| (MIN_VERIFY_DAYS..=MAX_VERIFY_DAYS).contains(v))
        .ok_or_else(|| {
            invalid(
                ANALYSIS,
                "verify_days",
                format!(
                    "verify_days must be between {} and {}",
                    MIN_VERIFY_DAYS, MAX_VERIFY_DAYS
                ),
            )
        })
}

pub fn read_reporting_unit(config: &dyn ConfigPort) -> Result<f64, FlowcrossError> {
    let value = read_double(config, "reporting_unit", DEFAULT_REPORTING_UNIT)?;
    if value <= 0.0 {
        return Err(invalid(
            ANALYSIS,
            "reporting_unit",
            "reporting_unit must be positive",
        ));
    }
    Ok(value)
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    if let Some(raw) = config.get_string(ANALYSIS, "market") {
        parse_market_filter(&raw).map_err(|e| invalid(ANALYSIS, "market", e.to_string()))?;
    }
    Ok(())
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), FlowcrossError> {
    if let Some(raw) = non_blank(config, ANALYSIS, "tickers") {
        parse_tickers(&raw).map_err(|e| invalid(ANALYSIS, "tickers", e.to_string()))?;
    }
    Ok(())
}
