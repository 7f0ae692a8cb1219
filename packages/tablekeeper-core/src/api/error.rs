use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Shown when an error response carries no usable `message`
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Shown when the server rejects the session
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Why a request ended in [`ApiError::RequestFailed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Server answered with a non-success status other than 401
    Status,
    /// No response within the configured timeout
    Timeout,
    /// Server could not be reached
    Connect,
    /// Any other transport failure
    Transport,
    /// Payload could not be converted to or from the expected shape
    Payload,
    /// Credential could not be persisted
    Storage,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Status => "status",
            FailureKind::Timeout => "timeout",
            FailureKind::Connect => "connect",
            FailureKind::Transport => "transport",
            FailureKind::Payload => "payload",
            FailureKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server answered 401. The session has already been cleared and the
    /// user sent to the login screen by the time the caller sees this.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    Unauthorized,

    /// Everything else. `message` is the text shown to the user.
    #[error("{message}")]
    RequestFailed {
        message: String,
        status: Option<u16>,
        kind: FailureKind,
    },
}

impl ApiError {
    pub fn request_failed(message: impl Into<String>, status: Option<u16>, kind: FailureKind) -> Self {
        ApiError::RequestFailed {
            message: message.into(),
            status,
            kind,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status that caused the failure, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    /// User-facing text for this failure
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Unauthorized => SESSION_EXPIRED_MESSAGE,
            ApiError::RequestFailed { message, .. } => message,
        }
    }
}
