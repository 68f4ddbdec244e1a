//! Raw provider rows: daily OHLCV bars, investor net volumes and market cap.

use chrono::NaiveDate;

/// One trading day as supplied by the market data provider.
///
/// Price and turnover fields may carry NaN or infinities from a dirty feed;
/// the normalizer drops such rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    /// Traded value for the day in raw currency units.
    pub turnover: f64,
}

impl OhlcvBar {
    /// All price and turnover fields are finite and volume is non-negative.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.turnover]
            .iter()
            .all(|v| v.is_finite())
            && self.volume >= 0
    }

    /// turnover / volume, or the close on a zero-volume day.
    pub fn avg_trade_price(&self) -> f64 {
        if self.volume > 0 {
            self.turnover / self.volume as f64
        } else {
            self.close
        }
    }
}

/// Net share volume traded by foreign and institutional investors on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestorFlow {
    pub date: NaiveDate,
    pub foreign_net_shares: f64,
    pub institution_net_shares: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketCapPoint {
    pub date: NaiveDate,
    pub market_cap: f64,
}
