//! Domain error types.

/// Top-level error type for flowcross.
#[derive(Debug, thiserror::Error)]
pub enum FlowcrossError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data provider failed for {ticker}: {reason}")]
    Provider { ticker: String, reason: String },

    #[error("no {dataset} data for {ticker}")]
    NoData { ticker: String, dataset: String },

    #[error("insufficient data for {ticker}: have {records} records, need {minimum}")]
    InsufficientData {
        ticker: String,
        records: usize,
        minimum: usize,
    },

    #[error("analysis unavailable: {reason}")]
    AnalysisUnavailable { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FlowcrossError> for std::process::ExitCode {
    fn from(err: &FlowcrossError) -> Self {
        let code: u8 = match err {
            FlowcrossError::Io(_) | FlowcrossError::Report { .. } => 1,
            FlowcrossError::ConfigParse { .. }
            | FlowcrossError::ConfigMissing { .. }
            | FlowcrossError::ConfigInvalid { .. } => 2,
            FlowcrossError::Provider { .. } => 3,
            FlowcrossError::NoData { .. } | FlowcrossError::InsufficientData { .. } => 5,
            FlowcrossError::AnalysisUnavailable { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
