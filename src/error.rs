//! Error types for the Flink SQL Gateway client.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Flink SQL Gateway client operations.
///
/// Every operation fails with one of these kinds, so callers can tell a
/// gateway that is unreachable apart from one that answers garbage or one
/// that is merely slow, without parsing log output.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection refused, DNS, hung request).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Gateway answered with a non-2xx status.
    #[error("Gateway returned HTTP {status} while trying to {context}")]
    Http { status: u16, context: String },

    /// Gateway answered 2xx but the body does not match the protocol.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Result polling reached its cap while the gateway still reported
    /// `NOT_READY`.
    #[error("Result not ready after {attempts} poll attempts")]
    RetryExhausted { attempts: u32 },

    /// A statement was submitted without an active session.
    #[error("No active session; create a session first")]
    NoActiveSession,

    /// A result row is shorter than the schema it is decoded against.
    #[error(
        "Malformed {schema} row: field '{field}' (position {index}) missing, row has {len} fields"
    )]
    MalformedRow {
        schema: &'static str,
        field: &'static str,
        index: usize,
        len: usize,
    },

    /// The discovery pass was cancelled.
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, context: impl Into<String>) -> Self {
        Self::Http {
            status,
            context: context.into(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                context: err.to_string(),
            }
        } else if err.is_decode() {
            Self::protocol(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}
