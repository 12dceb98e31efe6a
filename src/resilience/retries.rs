//! Retry decisions for upstream API calls.
//!
//! # Design Decisions
//! - Never retry POST/PUT/DELETE/PATCH (non-idempotent)
//! - Connection errors and timeouts always retryable for idempotent methods
//! - Only 502/503/504 responses are retried; other statuses are answers

use axum::http::{Method, StatusCode};

use crate::config::RetryConfig;

/// Whether an attempt that ended with `status` (or a transport failure when
/// `status` is `None`) may be repeated.
pub fn is_retryable(method: &Method, status: Option<StatusCode>) -> bool {
    if !method.is_idempotent() {
        return false;
    }
    match status {
        None => true,
        Some(status) => matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        ),
    }
}

/// Attempts allowed for a request with `method`.
pub fn max_attempts(method: &Method, retries: &RetryConfig) -> u32 {
    if retries.enabled && method.is_idempotent() {
        retries.max_attempts.max(1)
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_idempotent_methods_retry() {
        assert!(is_retryable(&Method::GET, None));
        assert!(is_retryable(&Method::GET, Some(StatusCode::SERVICE_UNAVAILABLE)));
        assert!(!is_retryable(&Method::POST, None));
        assert!(!is_retryable(&Method::POST, Some(StatusCode::BAD_GATEWAY)));
    }

    #[test]
    fn test_answers_are_not_retried() {
        assert!(!is_retryable(&Method::GET, Some(StatusCode::OK)));
        assert!(!is_retryable(&Method::GET, Some(StatusCode::NOT_FOUND)));
        assert!(!is_retryable(&Method::GET, Some(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[test]
    fn test_max_attempts() {
        let mut config = RetryConfig::default();
        assert_eq!(max_attempts(&Method::GET, &config), 3);
        assert_eq!(max_attempts(&Method::POST, &config), 1);

        config.enabled = false;
        assert_eq!(max_attempts(&Method::GET, &config), 1);
    }
}
