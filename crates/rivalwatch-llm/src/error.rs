//! LLM error types

use thiserror::Error;

/// LLM-related errors
#[derive(Error, Debug)]
pub enum LlmError {
    /// No usable provider credential
    #[error("API key not configured: {0}")]
    ApiKeyMissing(&'static str),

    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Completion came back without any text; only raised internally to
    /// trigger the primary endpoint retry
    #[error("Empty completion from {0}")]
    EmptyResponse(&'static str),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {0} seconds")]
    RateLimited(u64),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl LlmError {
    /// Whether the failure came from talking to a provider, as opposed to
    /// missing configuration
    pub fn is_transport(&self) -> bool {
        !matches!(self, LlmError::ApiKeyMissing(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::ConnectionError(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
