//! Technical indicators over normalized daily records.
//!
//! - `IndicatorPoint`: a single dated value, `None` until the window fills
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator points
//! - `IndicatorSet`: the per-day bundle the signal detector consumes

pub mod sma;

use crate::domain::daily_record::DailyRecord;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    /// Simple moving average of the average trade price.
    Sma(usize),
    /// Trailing mean of combined foreign and institutional net buying.
    NetFlowMean(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }
}

/// Indicator values attached to one trading day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSet {
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub smoothed_flow: Option<f64>,
}

/// Short and long moving averages of `avg_trade_price` for every record.
/// `smoothed_flow` is left undefined; the signal detector fills it in.
pub fn compute_moving_averages(
    records: &[DailyRecord],
    short_window: usize,
    long_window: usize,
) -> Vec<IndicatorSet> {
    let short = sma::calculate_sma(records, short_window);
    let long = sma::calculate_sma(records, long_window);

    (0..records.len())
        .map(|i| IndicatorSet {
            short_ma: short.value_at(i),
            long_ma: long.value_at(i),
            smoothed_flow: None,
        })
        .collect()
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::NetFlowMean(period) => write!(f, "NETFLOW({})", period),
        }
    }
}
