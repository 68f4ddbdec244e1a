//! Forward-looking signal performance.
//!
//! For each signal at t: entry = close[t], best = max(close[t+1..=t+h]),
//! return = (best - entry) / entry * 100. Success iff best > entry; a tie
//! is a failure. Signals with fewer than h records after them are skipped.

use crate::domain::error::FlowcrossError;
use crate::domain::series::AnalyzedSeries;
use chrono::NaiveDate;

pub const DEFAULT_VERIFY_DAYS: usize = 3;
pub const MIN_VERIFY_DAYS: usize = 1;
pub const MAX_VERIFY_DAYS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvaluation {
    pub date: NaiveDate,
    pub entry_price: f64,
    pub max_price: f64,
    pub return_pct: f64,
    pub outcome: SignalOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceResult {
    pub verify_days: usize,
    pub total_signals: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub returns: Vec<f64>,
    pub success_rate: f64,
    pub avg_gain: f64,
    pub max_gain: f64,
    pub avg_loss: f64,
    pub max_loss: f64,
    pub avg_return_at_horizon: f64,
    pub evaluations: Vec<SignalEvaluation>,
}

impl PerformanceResult {
    /// All-zero result for a series without verifiable signals.
    pub fn empty(verify_days: usize) -> Self {
        Self::from_evaluations(verify_days, Vec::new())
    }

    pub fn from_evaluations(verify_days: usize, evaluations: Vec<SignalEvaluation>) -> Self {
        let returns: Vec<f64> = evaluations.iter().map(|e| e.return_pct).collect();
        let success_count = evaluations
            .iter()
            .filter(|e| e.outcome == SignalOutcome::Success)
            .count();
        let total_signals = evaluations.len();
        let fail_count = total_signals - success_count;

        let success_rate = if total_signals > 0 {
            success_count as f64 / total_signals as f64 * 100.0
        } else {
            0.0
        };

        let gains: Vec<f64> = returns.iter().copied().filter(|&r| r > 0.0).collect();
        let losses: Vec<f64> = returns.iter().copied().filter(|&r| r <= 0.0).collect();

        Self {
            verify_days,
            total_signals,
            success_count,
            fail_count,
            success_rate,
            avg_gain: mean(&gains),
            max_gain: gains.iter().copied().reduce(f64::max).unwrap_or(0.0),
            avg_loss: mean(&losses),
            max_loss: losses.iter().copied().reduce(f64::min).unwrap_or(0.0),
            avg_return_at_horizon: mean(&returns),
            returns,
            evaluations,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Evaluate every verifiable signal in `series` over `verify_days`.
pub fn evaluate_signals(
    series: &AnalyzedSeries,
    verify_days: usize,
) -> Result<Vec<SignalEvaluation>, FlowcrossError> {
    if series.is_empty() {
        return Err(FlowcrossError::AnalysisUnavailable {
            reason: format!("{}: empty series", series.ticker),
        });
    }
    if verify_days == 0 {
        return Err(FlowcrossError::AnalysisUnavailable {
            reason: "verify_days must be at least 1".to_string(),
        });
    }

    let days = &series.days;
    let evaluations = series
        .signal_indices()
        .into_iter()
        .filter(|&t| t + verify_days < days.len())
        .map(|t| {
            let entry_price = days[t].record.close;
            let max_price = days[t + 1..=t + verify_days]
                .iter()
                .map(|d| d.record.close)
                .fold(f64::NEG_INFINITY, f64::max);
            let return_pct = (max_price - entry_price) / entry_price * 100.0;
            let outcome = if max_price > entry_price {
                SignalOutcome::Success
            } else {
                SignalOutcome::Failure
            };
            SignalEvaluation {
                date: days[t].record.date,
                entry_price,
                max_price,
                return_pct,
                outcome,
            }
        })
        .collect();

    Ok(evaluations)
}

pub fn evaluate_performance(
    series: &AnalyzedSeries,
    verify_days: usize,
) -> Result<PerformanceResult, FlowcrossError> {
    let evaluations = evaluate_signals(series, verify_days)?;
    Ok(PerformanceResult::from_evaluations(verify_days, evaluations))
}
