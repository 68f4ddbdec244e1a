//! Shared helper functions for indicator calculations.

use crate::domain::daily_record::DailyRecord;
use crate::domain::indicator::IndicatorPoint;

/// Trailing arithmetic mean of `sample(record)` over `period` records.
///
/// Points before the window fills are `None`. Non-finite samples count as
/// zero. A zero period yields an all-undefined series.
pub fn rolling_mean<F>(records: &[DailyRecord], period: usize, sample: F) -> Vec<IndicatorPoint>
where
    F: Fn(&DailyRecord) -> f64,
{
    let samples: Vec<f64> = records
        .iter()
        .map(|r| {
            let v = sample(r);
            if v.is_finite() { v } else { 0.0 }
        })
        .collect();

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let value = if period > 0 && i + 1 >= period {
                let window = &samples[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            } else {
                None
            };
            IndicatorPoint {
                date: record.date,
                value,
            }
        })
        .collect()
}
