//! Error taxonomy for calls against the remote vehicle API

use thiserror::Error;

/// Result type for remote API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised by the vehicle API client
///
/// All three kinds share this one type, so callers can either match a specific
/// kind or treat any `ApiError` as "the remote call failed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Network, timeout or transport-level failure (includes bad HTTP status)
    #[error("Error connecting to API: {0}")]
    Connection(String),

    /// Authentication failure. Not raised by the current call sites, the API is
    /// fronted by a trusted service.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Any other unexpected failure, wrapping the original cause
    #[error("Unexpected error: {0}")]
    Generic(String),
}

impl ApiError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a generic error
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic(message.into())
    }

    /// Whether this is a transport/timeout failure
    pub fn is_connection(&self) -> bool {
        matches!(self, ApiError::Connection(_))
    }

    /// Short machine-readable kind name
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Connection(_) => "connection",
            ApiError::Auth(_) => "auth",
            ApiError::Generic(_) => "generic",
        }
    }
}
