//! Provider client error types.

use std::sync::Arc;

/// Errors from any of the lookup providers.
///
/// The lookup pipeline decides what an error means: for the validation
/// provider it ends the lookup, for the others it degrades one field.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// The provider requires an API key and none was configured.
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),

    /// The HTTP client could not be constructed (TLS backend or builder options).
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// A configured base URL cannot carry path segments.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Non-200 HTTP response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response body was not the expected JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response parsed but the field we need was absent or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}
