//! Error types for the judging engine.
//!
//! Exactly two kinds exist. Every transport, provider, and setup failure is
//! normalized into one of them, so callers never branch on provider details.

use std::time::Duration;

/// Status for deployment problems (missing base URL, empty test list).
pub const STATUS_UNAVAILABLE: u16 = 503;
/// Status for a language outside the registry.
pub const STATUS_UNSUPPORTED: u16 = 400;
/// Status for transport failures and undecodable provider responses.
pub const STATUS_BAD_GATEWAY: u16 = 502;
/// Status for a call that exceeded its timeout budget.
pub const STATUS_GATEWAY_TIMEOUT: u16 = 504;
/// Status for a call aborted by the caller's cancellation token.
pub const STATUS_CANCELLED: u16 = 499;

/// Judging engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JudgeError {
    /// Deployment or request configuration problem. Never retried.
    #[error("configuration error ({status}): {message}")]
    Config { status: u16, message: String },

    /// The remote sandbox failed, errored, or exceeded the timeout budget.
    #[error("execution service error ({status}): {message}")]
    Service { status: u16, message: String },
}

impl JudgeError {
    pub fn config(status: u16, message: impl Into<String>) -> Self {
        Self::Config {
            status,
            message: message.into(),
        }
    }

    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    pub fn missing_base_url() -> Self {
        Self::config(STATUS_UNAVAILABLE, "execution service base URL is not configured")
    }

    pub fn unsupported_language(language: &str) -> Self {
        Self::config(
            STATUS_UNSUPPORTED,
            format!("unsupported language: {language}"),
        )
    }

    pub fn no_test_cases() -> Self {
        Self::config(STATUS_UNAVAILABLE, "no test cases configured")
    }

    pub fn timeout(budget: Duration) -> Self {
        Self::service(
            STATUS_GATEWAY_TIMEOUT,
            format!("execution timed out after {}ms", budget.as_millis()),
        )
    }

    pub fn cancelled() -> Self {
        Self::service(STATUS_CANCELLED, "execution cancelled by caller")
    }

    /// HTTP-style status for direct propagation to a response.
    pub fn status(&self) -> u16 {
        match self {
            Self::Config { status, .. } | Self::Service { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } | Self::Service { message, .. } => message,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Service {
                status: STATUS_GATEWAY_TIMEOUT,
                ..
            }
        )
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Service { .. } => 3,
        }
    }
}

impl From<reqwest::Error> for JudgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::service(STATUS_GATEWAY_TIMEOUT, err.to_string());
        }
        match err.status() {
            Some(status) => Self::service(status.as_u16(), err.to_string()),
            None => Self::service(STATUS_BAD_GATEWAY, format!("transport error: {err}")),
        }
    }
}

/// Result type for judging operations.
pub type JudgeResult<T> = Result<T, JudgeError>;
