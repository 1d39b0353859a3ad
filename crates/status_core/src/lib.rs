pub mod demo;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod store;

#[cfg(test)]
mod tests {
    use super::error::{AppError, ErrorCategory};

    #[test]
    fn app_error_is_structured() {
        let err = AppError::transport("request failed", "connection refused");
        assert_eq!(err.code, "API_TRANSPORT_FAILED");
        assert_eq!(err.details.as_deref(), Some("connection refused"));
        assert!(err.retryable);
        assert_eq!(err.category(), ErrorCategory::Transport);
    }

    #[test]
    fn app_error_categories_follow_code_prefix() {
        assert_eq!(AppError::new("API_STATUS_FAILED", "x").category(), ErrorCategory::Response);
        assert_eq!(AppError::malformed("x", "y").category(), ErrorCategory::Response);
        assert_eq!(AppError::new("CONFIG_INVALID", "x").category(), ErrorCategory::Config);
        assert_eq!(
            AppError::new("SESSION_INCIDENT_NOT_LOADED", "x").category(),
            ErrorCategory::Session
        );
        assert_eq!(AppError::new("STATE_UNKNOWN", "x").category(), ErrorCategory::Other);
    }
}
