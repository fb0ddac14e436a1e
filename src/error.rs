use thiserror::Error;

/// Failure talking to the language-model endpoint.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned no text content")]
    EmptyResponse,

    #[error("unexpected model response body: {0}")]
    Decode(String),
}

/// One strategy in a fallback chain declined its input.
#[derive(Debug, Clone, Error)]
#[error("{stage}: {reason}")]
pub struct StageFailure {
    pub stage: &'static str,
    pub reason: String,
}

impl StageFailure {
    pub fn new(stage: &'static str, reason: impl Into<String>) -> Self {
        Self {
            stage,
            reason: reason.into(),
        }
    }
}

/// Every strategy of a chain failed.
#[derive(Debug, Clone, Error)]
#[error("all {} fallback stages failed", failures.len())]
pub struct ChainExhausted {
    pub failures: Vec<StageFailure>,
}

#[derive(Debug, Error)]
pub enum WorthError {
    #[error("item must not be empty")]
    EmptyItem,

    #[error("could not produce worth comparisons: {0}")]
    ExhaustedFallback(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ChainExhausted> for WorthError {
    fn from(err: ChainExhausted) -> Self {
        let detail = err
            .failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        WorthError::ExhaustedFallback(detail)
    }
}
