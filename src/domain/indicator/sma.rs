//! Simple moving average of the average trade price.
//!
//! SMA(n)[i] = sum(P[i-j] for j in 0..n) / n
//! Warmup: first (n-1) records are undefined.

use crate::domain::daily_record::DailyRecord;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::rolling_mean;

pub fn calculate_sma(records: &[DailyRecord], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: rolling_mean(records, period, |r| r.avg_trade_price),
    }
}
