//! Error types for the FinPilot MCP server

use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, FinPilotError>;

/// Fallback message when the gateway rejects a request without a `message`.
pub const GENERIC_FAILURE_MESSAGE: &str = "API request failed";

/// Outcome of a gateway call that did not produce a payload.
///
/// Every variant renders as `API Error {status}: {message}`, which is the
/// string tool handlers place in the error envelope.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The gateway answered with a status >= 400.
    #[error("API Error {status}: {message}")]
    RemoteRejection {
        status: u16,
        message: String,
        details: Value,
    },

    #[error("API Error 504: Request timeout")]
    Timeout { detail: String },

    #[error("API Error 503: Failed to connect to API")]
    TransportFailure { detail: String },

    /// Success status, but the body was not JSON.
    #[error("API Error 502: Invalid response from API")]
    MalformedResponse { status: u16, detail: String },
}

impl GatewayError {
    /// HTTP-style status code for this error (synthesized for local failures)
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::RemoteRejection { status, .. } => *status,
            GatewayError::Timeout { .. } => 504,
            GatewayError::TransportFailure { .. } => 503,
            GatewayError::MalformedResponse { .. } => 502,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GatewayError::RemoteRejection { message, .. } => message,
            GatewayError::Timeout { .. } => "Request timeout",
            GatewayError::TransportFailure { .. } => "Failed to connect to API",
            GatewayError::MalformedResponse { .. } => "Invalid response from API",
        }
    }

    /// Structured details: the rejection body, or `{"error": <cause>}`.
    pub fn details(&self) -> Value {
        match self {
            GatewayError::RemoteRejection { details, .. } => details.clone(),
            GatewayError::Timeout { detail }
            | GatewayError::TransportFailure { detail }
            | GatewayError::MalformedResponse { detail, .. } => json!({ "error": detail }),
        }
    }
}

#[derive(Error, Debug)]
pub enum FinPilotError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    #[error("Tool execution aborted: {0}")]
    ToolAborted(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        let err = GatewayError::RemoteRejection {
            status: 404,
            message: "not found".to_string(),
            details: json!({"message": "not found"}),
        };
        assert_eq!(err.to_string(), "API Error 404: not found");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.details(), json!({"message": "not found"}));
    }

    #[test]
    fn test_synthesized_errors() {
        let timeout = GatewayError::Timeout {
            detail: "operation timed out".to_string(),
        };
        assert_eq!(timeout.status_code(), 504);
        assert_eq!(timeout.message(), "Request timeout");
        assert_eq!(timeout.details(), json!({"error": "operation timed out"}));

        let transport = GatewayError::TransportFailure {
            detail: "connection refused".to_string(),
        };
        assert_eq!(transport.status_code(), 503);
        assert_eq!(transport.to_string(), "API Error 503: Failed to connect to API");

        let malformed = GatewayError::MalformedResponse {
            status: 200,
            detail: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(malformed.status_code(), 502);
        assert_eq!(malformed.to_string(), "API Error 502: Invalid response from API");
    }

    #[test]
    fn test_gateway_error_is_transparent() {
        let err: FinPilotError = GatewayError::Timeout {
            detail: "slow".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "API Error 504: Request timeout");
    }
}
