#![allow(dead_code)]

use chrono::NaiveDate;
use flowcross::domain::analysis::AnalysisConfig;
use flowcross::domain::error::FlowcrossError;
pub use flowcross::domain::ohlcv::{InvestorFlow, MarketCapPoint, OhlcvBar};
use flowcross::domain::universe::{Market, TickerInfo, filter_by_market};
use flowcross::ports::data_port::{MarketCapPort, MarketDataPort};
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory provider for both data ports.
pub struct MockDataPort {
    pub bars: HashMap<String, Vec<OhlcvBar>>,
    pub flows: HashMap<String, Vec<InvestorFlow>>,
    pub caps: HashMap<String, Vec<MarketCapPoint>>,
    pub errors: HashMap<String, String>,
    pub listing: Vec<TickerInfo>,
    pub cap_calls: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            flows: HashMap::new(),
            caps: HashMap::new(),
            errors: HashMap::new(),
            listing: Vec::new(),
            cap_calls: Cell::new(0),
        }
    }

    pub fn with_series(
        mut self,
        ticker: &str,
        bars: Vec<OhlcvBar>,
        flows: Vec<InvestorFlow>,
    ) -> Self {
        self.bars.insert(ticker.to_string(), bars);
        self.flows.insert(ticker.to_string(), flows);
        self
    }

    pub fn with_market_cap(mut self, ticker: &str, points: Vec<MarketCapPoint>) -> Self {
        self.caps.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn with_listing(mut self, code: &str, market: Market) -> Self {
        self.listing.push(TickerInfo {
            code: code.to_string(),
            name: format!("Company {}", code),
            market,
        });
        self
    }

    fn check_error(&self, ticker: &str) -> Result<(), FlowcrossError> {
        match self.errors.get(ticker) {
            Some(reason) => Err(FlowcrossError::Provider {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, FlowcrossError> {
        self.check_error(ticker)?;
        Ok(self
            .bars
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_investor_flow(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<InvestorFlow>, FlowcrossError> {
        self.check_error(ticker)?;
        Ok(self
            .flows
            .get(ticker)
            .map(|flows| {
                flows
                    .iter()
                    .filter(|f| f.date >= start_date && f.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self, market: Option<Market>) -> Result<Vec<TickerInfo>, FlowcrossError> {
        Ok(filter_by_market(self.listing.clone(), market))
    }
}

impl MarketCapPort for MockDataPort {
    fn fetch_market_cap(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<MarketCapPoint>, FlowcrossError> {
        self.cap_calls.set(self.cap_calls.get() + 1);
        match self.caps.get(ticker) {
            Some(points) => Ok(points
                .iter()
                .filter(|p| p.date >= start_date && p.date <= end_date)
                .cloned()
                .collect()),
            None => Err(FlowcrossError::Provider {
                ticker: ticker.to_string(),
                reason: "market cap not found".to_string(),
            }),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Trading day `i`, counted in calendar days from 2024-01-01.
pub fn day(i: usize) -> NaiveDate {
    date(2024, 1, 1) + chrono::Duration::days(i as i64)
}

pub fn make_bar(i: usize, close: f64, volume: i64, turnover: f64) -> OhlcvBar {
    OhlcvBar {
        date: day(i),
        open: close,
        high: close,
        low: close,
        close,
        volume,
        turnover,
    }
}

pub fn make_flow(i: usize, foreign: f64, institution: f64) -> InvestorFlow {
    InvestorFlow {
        date: day(i),
        foreign_net_shares: foreign,
        institution_net_shares: institution,
    }
}

/// `count` bars at a constant close; every third day has zero volume.
/// Turnover matches the close, so the average trade price never moves.
pub fn flat_bars(count: usize, close: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let volume = if i % 3 == 0 { 0 } else { 1_000 };
            make_bar(i, close, volume, close * volume as f64)
        })
        .collect()
}

/// `count` bars at a constant close, each trading `turnover` in raw units.
pub fn flat_bars_with_turnover(count: usize, close: f64, turnover: f64) -> Vec<OhlcvBar> {
    let volume = (turnover / close) as i64;
    (0..count)
        .map(|i| make_bar(i, close, volume, turnover))
        .collect()
}

/// Zero net flow on every day in `0..count`.
pub fn quiet_flows(count: usize) -> Vec<InvestorFlow> {
    (0..count).map(|i| make_flow(i, 0.0, 0.0)).collect()
}

/// Index of the crossover day in `crossover_bars`.
pub const CROSSOVER_DAY: usize = 40;

/// 44 bars: close 100 through day 40, then closes 100, 105, 98.
///
/// Days 0-39 have no volume, so their average trade price is the close and
/// both moving averages sit at 100. Day 40 trades at an average price of
/// 150, lifting the 5-day MA to 110 over the 40-day MA of 101.25.
pub fn crossover_bars() -> Vec<OhlcvBar> {
    let mut bars: Vec<OhlcvBar> = (0..CROSSOVER_DAY)
        .map(|i| make_bar(i, 100.0, 0, 0.0))
        .collect();
    bars.push(make_bar(CROSSOVER_DAY, 100.0, 10, 1_500.0));
    for (offset, close) in [100.0, 105.0, 98.0].into_iter().enumerate() {
        bars.push(make_bar(CROSSOVER_DAY + 1 + offset, close, 0, 0.0));
    }
    bars
}

/// Net buying of 15 reporting units per day over the 10 days ending at the
/// crossover, split between foreign and institutional investors.
pub fn crossover_flows() -> Vec<InvestorFlow> {
    (CROSSOVER_DAY - 9..=CROSSOVER_DAY)
        .map(|i| {
            // amount = shares * avg_trade_price / 1e8
            let shares = if i == CROSSOVER_DAY { 1.0e7 } else { 1.5e7 };
            make_flow(i, shares * 0.6, shares * 0.4)
        })
        .collect()
}

pub fn config_for(bars: &[OhlcvBar]) -> AnalysisConfig {
    let start = bars.iter().map(|b| b.date).min().unwrap_or(day(0));
    let end = bars.iter().map(|b| b.date).max().unwrap_or(day(1));
    AnalysisConfig::new(start, end)
}

pub fn tickers(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}
