//! AnalyzedSeries: one ticker's normalized records with indicators and
//! signal flags attached.

use crate::domain::daily_record::DailyRecord;
use crate::domain::indicator::{IndicatorSet, compute_moving_averages};
use crate::domain::signal::detect_signals;
use chrono::NaiveDate;

/// Days used for the recent-turnover average.
pub const RECENT_TURNOVER_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedDay {
    pub record: DailyRecord,
    pub indicators: IndicatorSet,
    pub signal: bool,
}

#[derive(Debug, Clone)]
pub struct AnalyzedSeries {
    pub ticker: String,
    pub days: Vec<AnalyzedDay>,
}

/// Window parameters for the indicator and signal stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub short_window: usize,
    pub long_window: usize,
    pub flow_window: usize,
    pub flow_threshold: f64,
}

impl AnalyzedSeries {
    /// Run the indicator calculator and signal detector over `records`.
    pub fn build(ticker: &str, records: Vec<DailyRecord>, params: &SignalParams) -> Self {
        let mut indicators =
            compute_moving_averages(&records, params.short_window, params.long_window);
        let flags = detect_signals(
            &records,
            &mut indicators,
            params.flow_window,
            params.flow_threshold,
        );

        let days: Vec<AnalyzedDay> = records
            .into_iter()
            .zip(indicators)
            .zip(flags)
            .map(|((record, indicators), signal)| AnalyzedDay {
                record,
                indicators,
                signal,
            })
            .collect();

        Self::from_days(ticker, days)
    }

    pub fn from_days(ticker: &str, days: Vec<AnalyzedDay>) -> Self {
        Self {
            ticker: ticker.to_string(),
            days,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.record.date)
    }

    pub fn signal_indices(&self) -> Vec<usize> {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, d)| d.signal)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether the most recent trading day raised a signal.
    pub fn has_recent_signal(&self) -> bool {
        self.days.last().is_some_and(|d| d.signal)
    }

    /// Mean raw turnover over the last `days` records (fewer if the series
    /// is shorter). `None` on an empty series.
    pub fn recent_turnover_mean(&self, days: usize) -> Option<f64> {
        let take = days.min(self.days.len());
        if take == 0 {
            return None;
        }
        let tail = &self.days[self.days.len() - take..];
        Some(tail.iter().map(|d| d.record.turnover).sum::<f64>() / take as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(i: usize, price: f64, turnover: f64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0,
            turnover,
            avg_trade_price: price,
            foreign_net_amount: 20.0,
            institution_net_amount: 0.0,
        }
    }

    fn params() -> SignalParams {
        SignalParams {
            short_window: 2,
            long_window: 3,
            flow_window: 2,
            flow_threshold: 10.0,
        }
    }

    #[test]
    fn build_attaches_indicators_and_flags() {
        let prices = [10.0, 10.0, 10.0, 16.0, 17.0];
        let records: Vec<DailyRecord> = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| make_record(i, p, 1_000.0))
            .collect();
        let series = AnalyzedSeries::build("T", records, &params());

        assert_eq!(series.len(), 5);
        assert_eq!(series.days[1].indicators.short_ma, Some(10.0));
        assert_eq!(series.days[1].indicators.long_ma, None);
        assert_eq!(series.days[2].indicators.long_ma, Some(10.0));
        // day 3: short (10+16)/2 = 13 > long (10+10+16)/3 = 12, prev equal
        assert!(series.days[3].signal);
        assert!(!series.days[4].signal);
        assert_eq!(series.signal_indices(), vec![3]);
        assert!(!series.has_recent_signal());
    }

    #[test]
    fn last_date_is_latest_record() {
        let records: Vec<DailyRecord> = (0..3).map(|i| make_record(i, 10.0, 0.0)).collect();
        let series = AnalyzedSeries::build("T", records, &params());
        assert_eq!(
            series.last_date(),
            NaiveDate::from_ymd_opt(2024, 1, 3)
        );
    }

    #[test]
    fn recent_turnover_mean_uses_tail() {
        let turnovers = [100.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let records: Vec<DailyRecord> = turnovers
            .iter()
            .enumerate()
            .map(|(i, &t)| make_record(i, 10.0, t))
            .collect();
        let series = AnalyzedSeries::build("T", records, &params());

        assert_eq!(series.recent_turnover_mean(RECENT_TURNOVER_DAYS), Some(3.0));
        assert_eq!(series.recent_turnover_mean(10), Some(115.0 / 6.0));
    }

    #[test]
    fn empty_series() {
        let series = AnalyzedSeries::from_days("T", vec![]);
        assert!(series.is_empty());
        assert!(!series.has_recent_signal());
        assert_eq!(series.recent_turnover_mean(5), None);
        assert_eq!(series.last_date(), None);
    }
}
