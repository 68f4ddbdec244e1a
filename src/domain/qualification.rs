//! Qualification filter: turnover band, market-cap band and display policy.
//!
//! A ticker that fails any gate is excluded outright; the filter never hands
//! back a partially populated result.

use crate::domain::performance::PerformanceResult;
use crate::domain::series::{AnalyzedSeries, RECENT_TURNOVER_DAYS};
use crate::ports::data_port::MarketCapPort;
use chrono::{Duration, NaiveDate};
use std::fmt;
use tracing::debug;

/// Calendar days searched backwards from the end date for a market cap.
pub const MARKET_CAP_LOOKBACK_DAYS: i64 = 10;

/// Inclusive range where a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "[{}, {}]", min, max),
            (Some(min), None) => write!(f, "[{}, ∞)", min),
            (None, Some(max)) => write!(f, "(-∞, {}]", max),
            (None, None) => write!(f, "(-∞, ∞)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayPolicy {
    pub show_all: bool,
    pub show_recent_only: bool,
}

/// Caller-supplied gates for one analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct QualificationGates {
    pub end_date: NaiveDate,
    /// In reporting units.
    pub turnover_range: ValueRange,
    /// In raw currency units.
    pub market_cap_range: ValueRange,
    pub reporting_unit: f64,
    pub policy: DisplayPolicy,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotQualifiedReason {
    #[error("recent turnover {average:.2} outside {range}")]
    TurnoverOutOfRange { average: f64, range: ValueRange },

    #[error("market cap {market_cap} outside {range}")]
    MarketCapOutOfRange { market_cap: f64, range: ValueRange },

    #[error("market cap unavailable: {reason}")]
    MarketCapUnavailable { reason: String },

    #[error("no signal on the latest trading day")]
    NoRecentSignal,

    #[error("no signals in window")]
    NoSignals,
}

#[derive(Debug, Clone)]
pub enum Qualification {
    Qualified {
        series: AnalyzedSeries,
        performance: PerformanceResult,
    },
    NotQualified(NotQualifiedReason),
}

impl Qualification {
    pub fn is_qualified(&self) -> bool {
        matches!(self, Qualification::Qualified { .. })
    }
}

/// Mean turnover of the last five trading days, in reporting units.
pub fn check_turnover(
    series: &AnalyzedSeries,
    range: &ValueRange,
    reporting_unit: f64,
) -> Result<(), NotQualifiedReason> {
    if range.is_unbounded() {
        return Ok(());
    }
    let average = series
        .recent_turnover_mean(RECENT_TURNOVER_DAYS)
        .unwrap_or(0.0)
        / reporting_unit;
    if range.contains(average) {
        Ok(())
    } else {
        Err(NotQualifiedReason::TurnoverOutOfRange {
            average,
            range: *range,
        })
    }
}

/// Latest market cap within the lookback window ending at `end_date`.
/// The provider is not consulted when the range is unbounded.
pub fn check_market_cap(
    port: &dyn MarketCapPort,
    ticker: &str,
    end_date: NaiveDate,
    range: &ValueRange,
) -> Result<(), NotQualifiedReason> {
    if range.is_unbounded() {
        return Ok(());
    }
    let start_date = end_date - Duration::days(MARKET_CAP_LOOKBACK_DAYS);
    let points = port
        .fetch_market_cap(ticker, start_date, end_date)
        .map_err(|e| NotQualifiedReason::MarketCapUnavailable {
            reason: e.to_string(),
        })?;

    let latest = points
        .iter()
        .filter(|p| p.date <= end_date && p.market_cap.is_finite())
        .max_by_key(|p| p.date)
        .ok_or_else(|| NotQualifiedReason::MarketCapUnavailable {
            reason: format!("no data between {} and {}", start_date, end_date),
        })?;

    if range.contains(latest.market_cap) {
        Ok(())
    } else {
        Err(NotQualifiedReason::MarketCapOutOfRange {
            market_cap: latest.market_cap,
            range: *range,
        })
    }
}

pub fn check_display(
    series: &AnalyzedSeries,
    performance: &PerformanceResult,
    policy: &DisplayPolicy,
) -> Result<(), NotQualifiedReason> {
    if policy.show_recent_only {
        if series.has_recent_signal() {
            Ok(())
        } else {
            Err(NotQualifiedReason::NoRecentSignal)
        }
    } else if policy.show_all || performance.total_signals > 0 {
        Ok(())
    } else {
        Err(NotQualifiedReason::NoSignals)
    }
}

/// Apply the turnover gate, the market-cap gate and the display policy, in
/// that order.
pub fn qualify(
    series: AnalyzedSeries,
    performance: PerformanceResult,
    cap_port: &dyn MarketCapPort,
    gates: &QualificationGates,
) -> Qualification {
    let outcome = check_turnover(&series, &gates.turnover_range, gates.reporting_unit)
        .and_then(|()| {
            check_market_cap(
                cap_port,
                &series.ticker,
                gates.end_date,
                &gates.market_cap_range,
            )
        })
        .and_then(|()| check_display(&series, &performance, &gates.policy));

    match outcome {
        Ok(()) => Qualification::Qualified {
            series,
            performance,
        },
        Err(reason) => {
            debug!(ticker = %series.ticker, %reason, "not qualified");
            Qualification::NotQualified(reason)
        }
    }
}
