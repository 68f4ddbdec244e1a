//! Ticker universe: the listing of analyzable securities and ticker-list
//! parsing from configuration.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Listing order: KOSPI before KOSDAQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    Kospi,
    Kosdaq,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Kospi => write!(f, "KOSPI"),
            Market::Kosdaq => write!(f, "KOSDAQ"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),

    #[error("unknown market: {0} (expected KOSPI, KOSDAQ or ALL)")]
    UnknownMarket(String),
}

impl FromStr for Market {
    type Err = UniverseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KOSPI" => Ok(Market::Kospi),
            "KOSDAQ" => Ok(Market::Kosdaq),
            _ => Err(UniverseError::UnknownMarket(s.trim().to_string())),
        }
    }
}

/// Parse a market filter where `ALL` (or blank) means no filter.
pub fn parse_market_filter(input: &str) -> Result<Option<Market>, UniverseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerInfo {
    pub code: String,
    pub name: String,
    pub market: Market,
}

impl TickerInfo {
    /// "[KOSPI] 005930: Samsung Electronics"
    pub fn label(&self) -> String {
        format!("[{}] {}: {}", self.market, self.code, self.name)
    }
}

pub fn filter_by_market(tickers: Vec<TickerInfo>, market: Option<Market>) -> Vec<TickerInfo> {
    match market {
        Some(m) => tickers.into_iter().filter(|t| t.market == m).collect(),
        None => tickers,
    }
}

/// Split a comma-separated ticker list, rejecting blanks and duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(UniverseError::DuplicateTicker(ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}
