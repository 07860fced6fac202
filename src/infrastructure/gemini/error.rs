use thiserror::Error;

/// Errors that can occur when interacting with the Gemini API
#[derive(Error, Debug)]
pub enum GeminiApiError {
    /// Invalid request parameters or malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed due to invalid or missing API key
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded, retry after waiting
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// API server encountered an internal error
    #[error("API server error: {0}")]
    ServerError(String),

    /// Network error occurred during request
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out waiting for response
    #[error("Timeout waiting for response")]
    Timeout,

    /// Response arrived but carried no usable text (blocked, empty, or
    /// structurally unexpected)
    #[error("Unusable response: {0}")]
    UnusableResponse(String),

    /// Unknown error occurred
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GeminiApiError {
    /// Returns true if this error is transient and should be retried.
    ///
    /// Transient: rate limits, 5xx server errors, timeouts. Everything else
    /// fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GeminiApiError::RateLimitExceeded
                | GeminiApiError::ServerError(_)
                | GeminiApiError::Timeout
        )
    }

    /// Create error from HTTP status code and response body.
    ///
    /// - 400: invalid request
    /// - 401, 403: authentication failed
    /// - 429: rate limit exceeded
    /// - 5xx: server error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => GeminiApiError::InvalidRequest(body),
            401 | 403 => GeminiApiError::AuthenticationFailed(body),
            429 => GeminiApiError::RateLimitExceeded,
            500..=599 => GeminiApiError::ServerError(body),
            _ => GeminiApiError::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}
