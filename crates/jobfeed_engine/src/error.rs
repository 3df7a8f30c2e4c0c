use std::fmt;

use thiserror::Error;

/// Error taxonomy for gateway operations. No automatic retry anywhere in
/// this layer; all recovery is user-initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport or timeout failure, or a malformed server response.
    Network,
    /// HTTP 401: session expired, redirect to login.
    Auth,
    /// HTTP 404: the job is no longer available. Does not invalidate the
    /// rest of the cache.
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network error"),
            ErrorKind::Auth => write!(f, "session expired"),
            ErrorKind::NotFound => write!(f, "job not found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}
