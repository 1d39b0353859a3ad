use serde::{Deserialize, Serialize};
use std::fmt;

/// Single structured error shape shared by the store, the API client and the CLI.
///
/// `code` is a stable SCREAMING_SNAKE identifier; its prefix selects the
/// [`ErrorCategory`]. `details` carries raw diagnostic context (status codes,
/// decoder messages) that should not be shown as the primary message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

/// Coarse error classes used when deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request never produced an HTTP response.
    Transport,
    /// The server answered with an error status or a body we could not decode.
    Response,
    Config,
    /// A session action was rejected before any request was made.
    Session,
    Other,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Network-level failure: connection refused, DNS, timeout.
    pub fn transport(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new("API_TRANSPORT_FAILED", message)
            .with_details(details)
            .with_retryable(true)
    }

    /// The response arrived but its body does not match the expected shape.
    pub fn malformed(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new("API_RESPONSE_MALFORMED", message).with_details(details)
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code.as_str() {
            "API_TRANSPORT_FAILED" => ErrorCategory::Transport,
            c if c.starts_with("API_") => ErrorCategory::Response,
            c if c.starts_with("CONFIG_") => ErrorCategory::Config,
            c if c.starts_with("SESSION_") => ErrorCategory::Session,
            _ => ErrorCategory::Other,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}
