//! Domain error types.
//!
//! Expected absences (no zone, nothing to sell, not enough capital) are never
//! errors; they are `None` or empty collections at the call site.

/// Top-level error type for gridtrader.
#[derive(Debug, thiserror::Error)]
pub enum GridTraderError {
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

    #[error("unknown grid level '{name}'")]
    UnknownLevel { name: String },

    #[error("unknown take-profit target '{name}'")]
    UnknownTarget { name: String },

    #[error("unknown position #{id}")]
    UnknownPosition { id: u64 },

    #[error("unknown order #{id}")]
    UnknownOrder { id: u64 },

    #[error("cannot reserve {requested:.2} at {level}: only {available:.2} available")]
    CapitalOverCommitted {
        level: String,
        requested: f64,
        available: f64,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<&GridTraderError> for std::process::ExitCode {
    fn from(err: &GridTraderError) -> Self {
        let code: u8 = match err {
            GridTraderError::Io(_)
            | GridTraderError::Json(_)
            | GridTraderError::Report { .. } => 1,
            GridTraderError::ConfigParse { .. }
            | GridTraderError::ConfigMissing { .. }
            | GridTraderError::ConfigInvalid { .. } => 2,
            GridTraderError::NoData { .. }
            | GridTraderError::InsufficientData { .. }
            | GridTraderError::Data { .. } => 3,
            GridTraderError::UnknownLevel { .. }
            | GridTraderError::UnknownTarget { .. }
            | GridTraderError::UnknownPosition { .. }
            | GridTraderError::UnknownOrder { .. }
            | GridTraderError::CapitalOverCommitted { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
