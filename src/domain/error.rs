//! Domain error types.

/// Top-level error type for fxlab.
#[derive(Debug, thiserror::Error)]
pub enum FxlabError {
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

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("risk-adjusted return is indeterminate: max drawdown is zero")]
    ZeroDrawdown,

    #[error("all {attempted} simulations failed; first failure: {first_failure}")]
    SearchExhausted {
        attempted: usize,
        first_failure: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FxlabError {
    /// Shorthand for an invalid value under the `[strategy]` section.
    pub fn invalid_strategy(key: &str, reason: impl Into<String>) -> Self {
        FxlabError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an invalid value under the `[montecarlo]` section.
    pub fn invalid_montecarlo(key: &str, reason: impl Into<String>) -> Self {
        FxlabError::ConfigInvalid {
            section: "montecarlo".to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FxlabError> for std::process::ExitCode {
    fn from(err: &FxlabError) -> Self {
        let code: u8 = match err {
            FxlabError::Io(_) => 1,
            FxlabError::ConfigParse { .. }
            | FxlabError::ConfigMissing { .. }
            | FxlabError::ConfigInvalid { .. } => 2,
            FxlabError::Data { .. } | FxlabError::InsufficientData { .. } => 3,
            FxlabError::ZeroDrawdown => 4,
            FxlabError::SearchExhausted { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_invalid_message() {
        let err = FxlabError::invalid_strategy("ma_type", "expected SMA or EMA");
        assert_eq!(
            err.to_string(),
            "invalid config value [strategy] ma_type: expected SMA or EMA"
        );
    }

    #[test]
    fn zero_drawdown_message() {
        let err = FxlabError::ZeroDrawdown;
        assert!(err.to_string().contains("max drawdown is zero"));
    }

    #[test]
    fn search_exhausted_message() {
        let err = FxlabError::SearchExhausted {
            attempted: 10,
            first_failure: "insufficient data: have 1 bars, need 2".into(),
        };
        assert!(err.to_string().starts_with("all 10 simulations failed"));
    }
}
