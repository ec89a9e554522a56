//! Error types for batch compilation and execution.

use std::time::Duration;

use gqlbatch_schema::SchemaError;

/// Errors that can occur while building, sending or decoding an operation.
///
/// Execution-time errors are returned to the caller as-is; nothing in this
/// crate retries or falls back.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with an HTTP status of 400 or above.
    #[error("Bad response({status}) from server: {body}")]
    BadResponse {
        /// The HTTP status code.
        status: u16,
        /// The raw response body text.
        body: String,
    },

    /// The transport did not settle before the deadline.
    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The request failed below HTTP (connect, TLS, body read).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// The request body could not be serialized.
    #[error("Invalid GraphQL request: {0}")]
    InvalidRequest(serde_json::Error),

    /// A successful response body is not a GraphQL response.
    #[error("Invalid GraphQL response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Two items in one batch share an alias.
    #[error("Duplicate alias in batch: {alias}")]
    DuplicateAlias {
        /// The repeated alias.
        alias: String,
    },

    /// The operation root has no field with this name.
    #[error("Unknown {operation} field: {field}")]
    UnknownRootField {
        /// `query` or `mutation`.
        operation: String,
        /// The requested root field.
        field: String,
    },

    /// An argument was supplied that the root field does not declare.
    #[error("Field {field} has no argument {argument}")]
    UnknownArgument {
        /// The root field.
        field: String,
        /// The undeclared argument.
        argument: String,
    },

    /// The schema could not be loaded or walked.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

impl ClientError {
    /// Creates a new `BadResponse` error.
    #[must_use]
    pub fn bad_response(status: u16, body: impl Into<String>) -> Self {
        Self::BadResponse {
            status,
            body: body.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a new `Config` error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if the deadline elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the server answered with a 4xx/5xx status.
    #[must_use]
    pub fn is_bad_response(&self) -> bool {
        matches!(self, Self::BadResponse { .. })
    }

    /// The HTTP status, for `BadResponse` errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}
