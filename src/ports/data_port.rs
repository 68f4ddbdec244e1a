//! Market data port traits.
//!
//! Providers are synchronous and may be slow; the core never retries.

use crate::domain::error::FlowcrossError;
use crate::domain::ohlcv::{InvestorFlow, MarketCapPoint, OhlcvBar};
use crate::domain::universe::{Market, TickerInfo};
use chrono::NaiveDate;

/// Daily price/volume bars and investor net volumes.
pub trait MarketDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowcrossError>;

    /// Foreign and institutional net share volumes, date-aligned with
    /// `fetch_ohlcv` for the same range.
    fn fetch_investor_flow(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<InvestorFlow>, FlowcrossError>;

    /// Listed tickers, optionally restricted to one market.
    fn list_tickers(&self, market: Option<Market>) -> Result<Vec<TickerInfo>, FlowcrossError>;
}

/// Market capitalization history.
pub trait MarketCapPort {
    fn fetch_market_cap(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketCapPoint>, FlowcrossError>;
}
