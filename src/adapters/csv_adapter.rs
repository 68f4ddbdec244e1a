//! CSV file market data adapter.
//!
//! Directory layout under `base_path`:
//!
//! ```text
//! tickers.csv              code,name,market
//! ohlcv/<ticker>.csv       date,open,high,low,close,volume,turnover
//! investor/<ticker>.csv    date,foreign_net,institution_net
//! market_cap/<ticker>.csv  date,market_cap
//! ```
//!
//! Dates are `YYYY-MM-DD` or `YYYYMMDD`. Blank price or turnover cells are
//! read as missing and left for the normalizer to drop.

use crate::domain::error::FlowcrossError;
use crate::domain::ohlcv::{InvestorFlow, MarketCapPoint, OhlcvBar};
use crate::domain::universe::{Market, TickerInfo, filter_by_market};
use crate::ports::data_port::{MarketCapPort, MarketDataPort};
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

const OHLCV_DIR: &str = "ohlcv";
const INVESTOR_DIR: &str = "investor";
const MARKET_CAP_DIR: &str = "market_cap";
const TICKERS_FILE: &str = "tickers.csv";

#[derive(Debug, Deserialize)]
struct OhlcvRow {
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<i64>,
    turnover: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct InvestorRow {
    date: String,
    foreign_net: Option<f64>,
    institution_net: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MarketCapRow {
    date: String,
    market_cap: f64,
}

pub struct CsvMarketData {
    base_path: PathBuf,
}

impl CsvMarketData {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn dataset_path(&self, dataset: &str, ticker: &str) -> PathBuf {
        self.base_path.join(dataset).join(format!("{}.csv", ticker))
    }

    fn read_rows<T: DeserializeOwned>(
        &self,
        path: &Path,
        ticker: &str,
    ) -> Result<Vec<T>, FlowcrossError> {
        let provider_error = |reason: String| FlowcrossError::Provider {
            ticker: ticker.to_string(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| provider_error(format!("failed to read {}: {}", path.display(), e)))?;

        rdr.deserialize()
            .map(|row| {
                row.map_err(|e| {
                    provider_error(format!("CSV parse error in {}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
}

fn in_range(date: NaiveDate, start_date: NaiveDate, end_date: NaiveDate) -> bool {
    date >= start_date && date <= end_date
}

fn row_date(value: &str, ticker: &str) -> Result<NaiveDate, FlowcrossError> {
    parse_date(value).map_err(|e| FlowcrossError::Provider {
        ticker: ticker.to_string(),
        reason: format!("invalid date {:?}: {}", value, e),
    })
}

impl MarketDataPort for CsvMarketData {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowcrossError> {
        let rows: Vec<OhlcvRow> = self.read_rows(&self.dataset_path(OHLCV_DIR, ticker), ticker)?;
        let mut bars = Vec::with_capacity(rows.len());

        for row in rows {
            let date = row_date(&row.date, ticker)?;
            if !in_range(date, start_date, end_date) {
                continue;
            }
            let Some(volume) = row.volume else {
                debug!(ticker, %date, "skipping bar without volume");
                continue;
            };
            bars.push(OhlcvBar {
                date,
                open: row.open.unwrap_or(f64::NAN),
                high: row.high.unwrap_or(f64::NAN),
                low: row.low.unwrap_or(f64::NAN),
                close: row.close.unwrap_or(f64::NAN),
                volume,
                turnover: row.turnover.unwrap_or(f64::NAN),
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn fetch_investor_flow(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<InvestorFlow>, FlowcrossError> {
        let rows: Vec<InvestorRow> =
            self.read_rows(&self.dataset_path(INVESTOR_DIR, ticker), ticker)?;
        let mut flows = Vec::with_capacity(rows.len());

        for row in rows {
            let date = row_date(&row.date, ticker)?;
            if !in_range(date, start_date, end_date) {
                continue;
            }
            flows.push(InvestorFlow {
                date,
                foreign_net_shares: row.foreign_net.unwrap_or(f64::NAN),
                institution_net_shares: row.institution_net.unwrap_or(f64::NAN),
            });
        }

        flows.sort_by_key(|f| f.date);
        Ok(flows)
    }

    fn list_tickers(&self, market: Option<Market>) -> Result<Vec<TickerInfo>, FlowcrossError> {
        let path = self.base_path.join(TICKERS_FILE);
        let mut tickers: Vec<TickerInfo> = self.read_rows(&path, "listing")?;
        tickers.sort_by(|a, b| (a.market, &a.code).cmp(&(b.market, &b.code)));
        Ok(filter_by_market(tickers, market))
    }
}

impl MarketCapPort for CsvMarketData {
    fn fetch_market_cap(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketCapPoint>, FlowcrossError> {
        let rows: Vec<MarketCapRow> =
            self.read_rows(&self.dataset_path(MARKET_CAP_DIR, ticker), ticker)?;
        let mut points = Vec::with_capacity(rows.len());

        for row in rows {
            let date = row_date(&row.date, ticker)?;
            if in_range(date, start_date, end_date) {
                points.push(MarketCapPoint {
                    date,
                    market_cap: row.market_cap,
                });
            }
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
