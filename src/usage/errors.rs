//! Failure taxonomy for a refresh cycle.
//!
//! Missing credentials and a failed profile request are not errors: they are
//! absorbed before reaching this type. Everything here aborts the cycle and is
//! rendered as the error view.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("API returned {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("Request timed out")]
    Timeout { endpoint: &'static str },

    #[error("Request to {endpoint} failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },

    #[error("Malformed usage response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("{0}")]
    Unexpected(String),
}

impl UsageError {
    pub(crate) fn from_ureq(endpoint: &'static str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => UsageError::Status { endpoint, status },
            ureq::Error::Timeout(_) => UsageError::Timeout { endpoint },
            ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => {
                UsageError::Timeout { endpoint }
            }
            other => UsageError::Transport {
                endpoint,
                message: other.to_string(),
            },
        }
    }
}
