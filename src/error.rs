//! Error types for the PayGreen client

use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias for PayGreen operations
pub type Result<T> = std::result::Result<T, PaygreenError>;

/// Legacy code reported when no response could be obtained
pub const TRANSPORT_FAILURE_CODE: i64 = 1;

/// Legacy code reported when the response body was not JSON
pub const DECODE_FAILURE_CODE: i64 = 2;

/// Main error type for PayGreen operations
#[derive(Error, Debug)]
pub enum PaygreenError {
    /// Operation key absent from the endpoint registry
    #[error("Unknown operation: {operation}")]
    UnknownOperation { operation: String },

    /// Client built without a configuration
    #[error("Missing API configuration")]
    MissingConfiguration,

    /// Argument rejected before any request was sent
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The HTTP call could not complete
    #[error("Transport failure: {message}")]
    Transport { message: String },

    /// The response body was not valid JSON
    #[error("Decode failure: {0}")]
    Decode(#[from] serde_json::Error),

    /// The gateway answered with an `error` field
    #[error("API error: {code}")]
    Api { code: Value },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PaygreenError {
    /// Create an unknown operation error
    pub fn unknown_operation(operation: impl Into<String>) -> Self {
        Self::UnknownOperation {
            operation: operation.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the failure happened on the wire rather than in the caller
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Legacy error code for result-level failures.
    ///
    /// Transport and decode failures map to their fixed codes, gateway errors
    /// carry whatever the response said. Programmer errors have no code.
    pub fn code(&self) -> Option<Value> {
        match self {
            Self::Transport { .. } => Some(json!(TRANSPORT_FAILURE_CODE)),
            Self::Decode(_) => Some(json!(DECODE_FAILURE_CODE)),
            Self::Api { code } => Some(code.clone()),
            _ => None,
        }
    }

    /// The `{"error": code}` object older integrations branch on
    pub fn to_marker(&self) -> Option<Value> {
        self.code().map(|code| json!({ "error": code }))
    }
}
