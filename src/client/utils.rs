//! Utility functions for the REST client.
//!
//! Status code classification used by [`SplunkError`](crate::SplunkError) and by
//! callers that implement their own retry policy.

/// Check if status code indicates retryable error
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 502 | 503 | 504)
}

/// Check if status code indicates access denied
pub fn is_access_denied_status(status: u16) -> bool {
    matches!(status, 401 | 403)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(429));
        assert!(!is_retryable_status(404));
    }

    #[test]
    fn test_is_access_denied_status() {
        assert!(is_access_denied_status(401));
        assert!(!is_access_denied_status(400));
    }
}
