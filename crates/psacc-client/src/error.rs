//! Mapping of transport failures onto the client error taxonomy

use psacc_core::ApiError;

/// Classify a reqwest failure.
///
/// Timeouts, connection failures and non-success HTTP statuses are all
/// transport problems from the caller's point of view. Only a body that
/// cannot be decoded is reported as unexpected.
pub(crate) fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::connection("Timeout connecting to API")
    } else if err.is_decode() {
        ApiError::generic(err.to_string())
    } else {
        ApiError::connection(err.to_string())
    }
}
