use thiserror::Error;

/// Typed error taxonomy for the analysis pipeline and its HTTP surface.
///
/// `CalculationError` never escapes the orchestrator: a failing metric
/// calculator degrades to a zeroed `MetricResult` and a logged warning
/// instead of propagating (see `abtest-analytics::orchestrator`). The other
/// variants propagate to the HTTP layer, which maps them to status codes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InputMissing(String),

    #[error("{0}")]
    InputMalformed(String),

    #[error("{0}")]
    ConfigError(String),

    #[error("{0}")]
    CalculationError(String),

    #[error("{0}")]
    EnvelopeError(String),
}

impl AppError {
    #[must_use]
    pub fn input_missing(msg: impl Into<String>) -> Self {
        Self::InputMissing(msg.into())
    }

    #[must_use]
    pub fn input_malformed(msg: impl Into<String>) -> Self {
        Self::InputMalformed(msg.into())
    }

    #[must_use]
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    #[must_use]
    pub fn envelope_error(msg: impl Into<String>) -> Self {
        Self::EnvelopeError(msg.into())
    }
}
