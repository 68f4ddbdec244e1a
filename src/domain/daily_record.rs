//! Normalized per-day records and the data normalizer.
//!
//! Cleans a raw OHLCV series and the matching investor-flow series into one
//! ordered `DailyRecord` per trading date. Rows with non-finite price or
//! turnover fields are dropped; investor amounts are always populated.

use crate::domain::error::FlowcrossError;
use crate::domain::ohlcv::{InvestorFlow, OhlcvBar};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Hundred-million currency units (억원).
pub const DEFAULT_REPORTING_UNIT: f64 = 100_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub turnover: f64,
    pub avg_trade_price: f64,
    /// Foreign net buying in reporting units.
    pub foreign_net_amount: f64,
    /// Institutional net buying in reporting units.
    pub institution_net_amount: f64,
}

impl DailyRecord {
    /// Combined foreign and institutional net buying.
    pub fn net_flow(&self) -> f64 {
        self.foreign_net_amount + self.institution_net_amount
    }
}

/// Build the normalized series for `ticker`.
///
/// Fails with `NoData` when either input is empty and with
/// `InsufficientData` when fewer than `min_records` bars exist before or
/// after cleaning.
///
/// `avg_trade_price` and `turnover` are kept at full precision, so they can
/// differ in the third decimal from tools that round them to 2 places.
pub fn normalize(
    ticker: &str,
    bars: &[OhlcvBar],
    flows: &[InvestorFlow],
    min_records: usize,
    reporting_unit: f64,
) -> Result<Vec<DailyRecord>, FlowcrossError> {
    if bars.is_empty() {
        return Err(FlowcrossError::NoData {
            ticker: ticker.to_string(),
            dataset: "ohlcv".to_string(),
        });
    }
    if flows.is_empty() {
        return Err(FlowcrossError::NoData {
            ticker: ticker.to_string(),
            dataset: "investor".to_string(),
        });
    }
    if bars.len() < min_records {
        return Err(FlowcrossError::InsufficientData {
            ticker: ticker.to_string(),
            records: bars.len(),
            minimum: min_records,
        });
    }

    let mut clean: Vec<&OhlcvBar> = bars.iter().filter(|b| b.is_complete()).collect();
    clean.sort_by_key(|b| b.date);
    clean.dedup_by_key(|b| b.date);

    let dropped = bars.len() - clean.len();
    if dropped > 0 {
        debug!(ticker, dropped, "dropped incomplete or duplicate bars");
    }

    if clean.len() < min_records {
        return Err(FlowcrossError::InsufficientData {
            ticker: ticker.to_string(),
            records: clean.len(),
            minimum: min_records,
        });
    }

    let flow_by_date: HashMap<NaiveDate, &InvestorFlow> =
        flows.iter().map(|f| (f.date, f)).collect();

    let records = clean
        .into_iter()
        .map(|bar| {
            let avg_trade_price = bar.avg_trade_price();
            let (foreign, institution) = match flow_by_date.get(&bar.date) {
                Some(flow) => (
                    to_amount(flow.foreign_net_shares, avg_trade_price, reporting_unit),
                    to_amount(flow.institution_net_shares, avg_trade_price, reporting_unit),
                ),
                None => (0.0, 0.0),
            };
            DailyRecord {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                turnover: bar.turnover,
                avg_trade_price,
                foreign_net_amount: foreign,
                institution_net_amount: institution,
            }
        })
        .collect();

    Ok(records)
}

fn to_amount(net_shares: f64, avg_trade_price: f64, reporting_unit: f64) -> f64 {
    let amount = net_shares * avg_trade_price / reporting_unit;
    if amount.is_finite() { amount } else { 0.0 }
}
