//! Per-ticker analysis pipeline.
//!
//! fetch → normalize → indicators → signals → performance → qualification.
//! Each call owns its data; nothing is shared between tickers.
//!
//! AnalysisConfig defines the analysis window, indicator windows and gates.

use crate::domain::daily_record::{DEFAULT_REPORTING_UNIT, normalize};
use crate::domain::error::FlowcrossError;
use crate::domain::ohlcv::{InvestorFlow, OhlcvBar};
use crate::domain::performance::{DEFAULT_VERIFY_DAYS, PerformanceResult, evaluate_performance};
use crate::domain::qualification::{
    DisplayPolicy, NotQualifiedReason, Qualification, QualificationGates, ValueRange, qualify,
};
use crate::domain::series::{AnalyzedSeries, SignalParams};
use crate::domain::signal::{DEFAULT_FLOW_THRESHOLD, DEFAULT_FLOW_WINDOW};
use crate::ports::data_port::{MarketCapPort, MarketDataPort};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
    pub flow_window: usize,
    pub flow_threshold: f64,
    pub verify_days: usize,
    pub reporting_unit: f64,
    pub turnover_range: ValueRange,
    pub market_cap_range: ValueRange,
    pub show_all: bool,
    pub show_recent_only: bool,
}

impl AnalysisConfig {
    /// Default parameters over `[start_date, end_date]`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            flow_window: DEFAULT_FLOW_WINDOW,
            flow_threshold: DEFAULT_FLOW_THRESHOLD,
            verify_days: DEFAULT_VERIFY_DAYS,
            reporting_unit: DEFAULT_REPORTING_UNIT,
            turnover_range: ValueRange::unbounded(),
            market_cap_range: ValueRange::unbounded(),
            show_all: false,
            show_recent_only: false,
        }
    }

    pub fn signal_params(&self) -> SignalParams {
        SignalParams {
            short_window: self.short_window,
            long_window: self.long_window,
            flow_window: self.flow_window,
            flow_threshold: self.flow_threshold,
        }
    }

    pub fn gates(&self) -> QualificationGates {
        QualificationGates {
            end_date: self.end_date,
            turnover_range: self.turnover_range,
            market_cap_range: self.market_cap_range,
            reporting_unit: self.reporting_unit,
            policy: DisplayPolicy {
                show_all: self.show_all,
                show_recent_only: self.show_recent_only,
            },
        }
    }
}

/// One displayable ticker.
#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    pub ticker: String,
    pub series: AnalyzedSeries,
    pub performance: PerformanceResult,
}

#[derive(Debug)]
pub enum TickerOutcome {
    Displayed(TickerAnalysis),
    NotQualified {
        ticker: String,
        reason: NotQualifiedReason,
    },
    Failed {
        ticker: String,
        error: FlowcrossError,
    },
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Displayed(a) => &a.ticker,
            TickerOutcome::NotQualified { ticker, .. } | TickerOutcome::Failed { ticker, .. } => {
                ticker
            }
        }
    }
}

/// Normalize raw series, attach indicators and signals, and evaluate
/// performance. Pure: identical inputs give identical outputs.
pub fn analyze_series(
    ticker: &str,
    bars: &[OhlcvBar],
    flows: &[InvestorFlow],
    config: &AnalysisConfig,
) -> Result<(AnalyzedSeries, PerformanceResult), FlowcrossError> {
    let records = normalize(
        ticker,
        bars,
        flows,
        config.long_window,
        config.reporting_unit,
    )?;
    let series = AnalyzedSeries::build(ticker, records, &config.signal_params());
    let performance = evaluate_performance(&series, config.verify_days)?;
    Ok((series, performance))
}

/// Fetch both series for `ticker` and run `analyze_series`.
pub fn fetch_and_analyze(
    data_port: &dyn MarketDataPort,
    ticker: &str,
    config: &AnalysisConfig,
) -> Result<(AnalyzedSeries, PerformanceResult), FlowcrossError> {
    let bars = data_port.fetch_ohlcv(ticker, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(FlowcrossError::NoData {
            ticker: ticker.to_string(),
            dataset: "ohlcv".to_string(),
        });
    }
    let flows = data_port.fetch_investor_flow(ticker, config.start_date, config.end_date)?;
    debug!(ticker, bars = bars.len(), flows = flows.len(), "fetched");
    analyze_series(ticker, &bars, &flows, config)
}

/// Full pipeline for one ticker. Every failure is captured in the outcome.
pub fn analyze_ticker(
    data_port: &dyn MarketDataPort,
    cap_port: &dyn MarketCapPort,
    ticker: &str,
    config: &AnalysisConfig,
) -> TickerOutcome {
    let (series, performance) = match fetch_and_analyze(data_port, ticker, config) {
        Ok(pair) => pair,
        Err(error) => {
            warn!(ticker, %error, "skipping ticker");
            return TickerOutcome::Failed {
                ticker: ticker.to_string(),
                error,
            };
        }
    };

    match qualify(series, performance, cap_port, &config.gates()) {
        Qualification::Qualified {
            series,
            performance,
        } => {
            info!(
                ticker,
                signals = performance.total_signals,
                success_rate = performance.success_rate,
                "analyzed"
            );
            TickerOutcome::Displayed(TickerAnalysis {
                ticker: ticker.to_string(),
                series,
                performance,
            })
        }
        Qualification::NotQualified(reason) => TickerOutcome::NotQualified {
            ticker: ticker.to_string(),
            reason,
        },
    }
}
