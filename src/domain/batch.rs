//! Resumable batch driver over an ordered ticker list.
//!
//! The engine itself is stateless; progress lives in `BatchProgress`, which
//! the caller passes in and gets back. Pausing only happens between tickers.

use crate::domain::analysis::{AnalysisConfig, TickerAnalysis, TickerOutcome, analyze_ticker};
use crate::ports::data_port::{MarketCapPort, MarketDataPort};
use tracing::info;

/// Answer from the caller's control hook before each ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchControl {
    Continue,
    Pause,
}

#[derive(Debug, Default)]
pub struct BatchProgress {
    /// Index of the next ticker to analyze.
    pub processed_index: usize,
    pub results_so_far: Vec<TickerOutcome>,
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub ticker: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub displayed: usize,
    pub not_qualified: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_complete(&self, total: usize) -> bool {
        self.processed_index >= total
    }

    /// Fraction of `total` processed, in `[0, 1]`.
    pub fn fraction(&self, total: usize) -> f64 {
        if total == 0 {
            1.0
        } else {
            self.processed_index.min(total) as f64 / total as f64
        }
    }

    pub fn displayed(&self) -> impl Iterator<Item = &TickerAnalysis> {
        self.results_so_far.iter().filter_map(|o| match o {
            TickerOutcome::Displayed(a) => Some(a),
            _ => None,
        })
    }

    pub fn summary(&self) -> BatchSummary {
        let mut displayed = 0;
        let mut not_qualified = 0;
        let mut failures = Vec::new();

        for outcome in &self.results_so_far {
            match outcome {
                TickerOutcome::Displayed(_) => displayed += 1,
                TickerOutcome::NotQualified { .. } => not_qualified += 1,
                TickerOutcome::Failed { ticker, error } => failures.push(BatchFailure {
                    ticker: ticker.clone(),
                    reason: error.to_string(),
                }),
            }
        }

        BatchSummary {
            displayed,
            not_qualified,
            failures,
        }
    }
}

/// Analyze `tickers` starting at `progress.processed_index`.
///
/// `control` runs before each ticker with its index; returning
/// `BatchControl::Pause` marks the progress paused and returns it with that
/// ticker still unprocessed. A paused progress is returned untouched until
/// the caller calls `resume`.
pub fn run_batch<F>(
    data_port: &dyn MarketDataPort,
    cap_port: &dyn MarketCapPort,
    tickers: &[String],
    config: &AnalysisConfig,
    mut progress: BatchProgress,
    mut control: F,
) -> BatchProgress
where
    F: FnMut(usize, &str) -> BatchControl,
{
    if progress.paused {
        return progress;
    }

    let total = tickers.len();
    while progress.processed_index < total {
        let index = progress.processed_index;
        let ticker = &tickers[index];

        if control(index, ticker) == BatchControl::Pause {
            info!(index, total, "batch paused");
            progress.paused = true;
            return progress;
        }

        info!("Analyzing {} ({}/{})", ticker, index + 1, total);
        let outcome = analyze_ticker(data_port, cap_port, ticker, config);
        progress.results_so_far.push(outcome);
        progress.processed_index = index + 1;
    }

    progress
}
