//! Error types for slidevox.

use thiserror::Error;

/// Primary error type for all slidevox operations.
///
/// Fatal kinds (`Configuration`, `Data`) abort a run before any synthesis is
/// attempted; everything else is caught at the per-entry boundary inside the
/// materializer batch loop.
#[derive(Error, Debug)]
pub enum SlidevoxError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Provider error: {provider} — {message}")]
    Provider { provider: String, message: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl SlidevoxError {
    /// Create an API error from a provider status and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Whether this error must abort the whole run rather than one entry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Data(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SlidevoxError>;
