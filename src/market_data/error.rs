use reqwest::StatusCode;
use thiserror::Error;

/// Why a provider produced no usable quote.
///
/// None of these are fatal: the resolver logs the miss and moves on to the
/// next provider in the chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("unusable payload: {0}")]
    Payload(String),
}

impl ProviderError {
    pub fn payload(reason: impl Into<String>) -> Self {
        Self::Payload(reason.into())
    }

    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status(_) => "status",
            Self::Payload(_) => "payload",
        }
    }
}
