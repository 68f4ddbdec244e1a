//! Core domain types and the analysis pipeline.

pub mod ohlcv;
pub mod daily_record;
pub mod indicator;
pub mod indicator_helpers;
pub mod signal;
pub mod series;
pub mod performance;
pub mod qualification;
pub mod analysis;
pub mod batch;
pub mod universe;
pub mod config_validation;
pub mod error;
