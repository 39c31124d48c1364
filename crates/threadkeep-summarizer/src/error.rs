//! Error types for summarizers.

use thiserror::Error;

/// Summarizer error types.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Authentication error (invalid API key, etc.).
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    /// Error response from the endpoint.
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SummarizerError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
