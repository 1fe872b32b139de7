//! Client-level error type.
//!
//! Every failure that leaves a component is one of four kinds. Gateway
//! adapters produce `Network` and `Remote`; services produce `Validation`
//! before any call is issued; credential storage adapters produce `Storage`.

use std::fmt;

use serde_json::Value;

/// Generic message used when the server gives no `detail`.
pub const GENERIC_REMOTE_MESSAGE: &str = "API request failed";

/// Stable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No response reached the client (DNS, refused connection, timeout).
    Network,
    /// The server answered outside 2xx, or with a payload that does not
    /// match the expected schema.
    Remote,
    /// Input was rejected locally; nothing was sent.
    Validation,
    /// Local durable storage failed.
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Network => "network",
            Self::Remote => "remote",
            Self::Validation => "validation",
            Self::Storage => "storage",
        };
        f.write_str(label)
    }
}

/// Error surfaced to callers of the client.
///
/// ## Invariants
/// - `message` is never empty; blank messages fall back to a per-kind
///   default.
/// - `status` is only set for [`ErrorKind::Remote`] errors that carried an
///   HTTP status.
///
/// # Examples
/// ```
/// use client::domain::{Error, ErrorKind};
///
/// let err = Error::remote_status(401, "Incorrect email or password");
/// assert_eq!(err.kind(), ErrorKind::Remote);
/// assert_eq!(err.status(), Some(401));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
}

impl Error {
    /// Create a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            default_message(kind).to_owned()
        } else {
            message
        };
        Self {
            kind,
            message,
            status: None,
        }
    }

    /// Convenience constructor for [`ErrorKind::Network`].
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// Convenience constructor for [`ErrorKind::Remote`] without a status.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message)
    }

    /// Remote error carrying the HTTP status that produced it.
    pub fn remote_status(status: u16, message: impl Into<String>) -> Self {
        let mut error = Self::new(ErrorKind::Remote, message);
        error.status = Some(status);
        error
    }

    /// Remote error built from a non-2xx response body.
    ///
    /// Uses the server's `detail` string when present, otherwise
    /// [`GENERIC_REMOTE_MESSAGE`].
    pub fn from_remote_body(status: u16, body: Option<&Value>) -> Self {
        let detail = body
            .and_then(|value| value.get("detail"))
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_REMOTE_MESSAGE);
        Self::remote_status(status, detail)
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::Storage`].
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// HTTP status for remote errors, when known.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Whether this error is the local-validation kind.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

fn default_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Network => "network request failed",
        ErrorKind::Remote => GENERIC_REMOTE_MESSAGE,
        ErrorKind::Validation => "invalid input",
        ErrorKind::Storage => "credential storage failed",
    }
}
