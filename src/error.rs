//! Error codes shared by every layer that can surface a notification.

use serde::Serialize;

/// Stable machine-readable code attached to each user-visible error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body sent to clients for any failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    pub retryable: bool,
}

impl ErrorBody {
    pub fn from_error(err: &impl ErrorCode) -> Self {
        Self { error: err.to_string(), code: err.error_code(), retryable: err.retryable() }
    }
}
