//! Signal detection: moving-average golden cross gated by net buying.
//!
//! A day raises a signal when the short MA crosses from at-or-below to above
//! the long MA and the smoothed foreign + institutional net buying is at or
//! above the flow threshold.

use crate::domain::daily_record::DailyRecord;
use crate::domain::indicator::{IndicatorSeries, IndicatorSet, IndicatorType};
use crate::domain::indicator_helpers::rolling_mean;

pub const DEFAULT_FLOW_WINDOW: usize = 10;
pub const DEFAULT_FLOW_THRESHOLD: f64 = 10.0;

/// Trailing mean of `foreign_net_amount + institution_net_amount`.
pub fn calculate_smoothed_flow(records: &[DailyRecord], window: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::NetFlowMean(window),
        values: rolling_mean(records, window, DailyRecord::net_flow),
    }
}

/// `short > long` today and `short <= long` yesterday, all four defined.
pub fn is_crossover(prev: &IndicatorSet, curr: &IndicatorSet) -> bool {
    match (prev.short_ma, prev.long_ma, curr.short_ma, curr.long_ma) {
        (Some(ps), Some(pl), Some(cs), Some(cl)) => cs > cl && ps <= pl,
        _ => false,
    }
}

pub fn meets_flow_threshold(set: &IndicatorSet, threshold: f64) -> bool {
    set.smoothed_flow.is_some_and(|flow| flow >= threshold)
}

/// Fill `smoothed_flow` on every indicator set and return the per-day
/// signal flags. `indicators` must be index-aligned with `records`.
pub fn detect_signals(
    records: &[DailyRecord],
    indicators: &mut [IndicatorSet],
    flow_window: usize,
    flow_threshold: f64,
) -> Vec<bool> {
    let flow = calculate_smoothed_flow(records, flow_window);
    for (i, set) in indicators.iter_mut().enumerate() {
        set.smoothed_flow = flow.value_at(i);
    }

    (0..indicators.len())
        .map(|i| {
            i > 0
                && is_crossover(&indicators[i - 1], &indicators[i])
                && meets_flow_threshold(&indicators[i], flow_threshold)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn set(short: Option<f64>, long: Option<f64>, flow: Option<f64>) -> IndicatorSet {
        IndicatorSet {
            short_ma: short,
            long_ma: long,
            smoothed_flow: flow,
        }
    }

    fn make_record(i: usize, net_flow: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 0,
            turnover: 0.0,
            avg_trade_price: 100.0,
            foreign_net_amount: net_flow / 2.0,
            institution_net_amount: net_flow / 2.0,
        }
    }

    #[test]
    fn crossover_from_below() {
        let prev = set(Some(9.0), Some(10.0), None);
        let curr = set(Some(11.0), Some(10.0), None);
        assert!(is_crossover(&prev, &curr));
    }

    #[test]
    fn crossover_from_equal() {
        let prev = set(Some(10.0), Some(10.0), None);
        let curr = set(Some(10.5), Some(10.0), None);
        assert!(is_crossover(&prev, &curr));
    }

    #[test]
    fn no_crossover_when_already_above() {
        let prev = set(Some(11.0), Some(10.0), None);
        let curr = set(Some(12.0), Some(10.0), None);
        assert!(!is_crossover(&prev, &curr));
    }

    #[test]
    fn no_crossover_when_touching() {
        let prev = set(Some(9.0), Some(10.0), None);
        let curr = set(Some(10.0), Some(10.0), None);
        assert!(!is_crossover(&prev, &curr));
    }

    #[test]
    fn undefined_previous_blocks_crossover() {
        let prev = set(Some(9.0), None, None);
        let curr = set(Some(11.0), Some(10.0), None);
        assert!(!is_crossover(&prev, &curr));
    }

    #[test]
    fn flow_threshold_is_inclusive() {
        assert!(meets_flow_threshold(&set(None, None, Some(10.0)), 10.0));
        assert!(!meets_flow_threshold(&set(None, None, Some(9.99)), 10.0));
        assert!(!meets_flow_threshold(&set(None, None, None), 10.0));
    }

    #[test]
    fn smoothed_flow_over_window() {
        let records: Vec<DailyRecord> = [10.0, 20.0, 30.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| make_record(i, f))
            .collect();
        let series = calculate_smoothed_flow(&records, 2);
        assert_eq!(series.indicator_type, IndicatorType::NetFlowMean(2));
        assert_eq!(series.value_at(0), None);
        assert_eq!(series.value_at(1), Some(15.0));
        assert_eq!(series.value_at(2), Some(25.0));
    }

    #[test]
    fn signal_requires_both_conditions() {
        let records: Vec<DailyRecord> = [12.0, 12.0, 12.0, 0.0, 0.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| make_record(i, f))
            .collect();
        let mut indicators = vec![
            set(Some(9.0), Some(10.0), None),
            set(Some(9.0), Some(10.0), None),
            // cross with strong flow
            set(Some(11.0), Some(10.0), None),
            set(Some(9.0), Some(10.0), None),
            set(Some(9.0), Some(10.0), None),
            // cross with weak flow
            set(Some(11.0), Some(10.0), None),
        ];

        let flags = detect_signals(&records, &mut indicators, 2, 10.0);

        assert_eq!(flags, vec![false, false, true, false, false, false]);
        assert_eq!(indicators[2].smoothed_flow, Some(12.0));
        assert_eq!(indicators[5].smoothed_flow, Some(0.0));
        assert_eq!(indicators[0].smoothed_flow, None);
    }

    #[test]
    fn first_day_never_signals() {
        let records = vec![make_record(0, 100.0)];
        let mut indicators = vec![set(Some(11.0), Some(10.0), None)];
        let flags = detect_signals(&records, &mut indicators, 1, 10.0);
        assert_eq!(flags, vec![false]);
    }
}
