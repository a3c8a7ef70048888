//! Error types for the GitHub to Rundeck adapter.
//!
//! Validation failures are not errors here: they become a 400 response.
//! `AppError` covers everything that fails the invocation itself and is
//! turned into a Lambda `Diagnostic` at the handler boundary.

use lambda_runtime::Diagnostic;
use std::fmt;

/// Custom error type for the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid environment configuration
    ConfigError(String),
    /// The inbound event or its body could not be parsed
    InvalidInput(String),
    /// The Rundeck API could not be reached (no HTTP response)
    DispatchError(String),
    /// Failed to encode an outbound or response body
    SerializationError(String),
}

impl AppError {
    /// Short machine-readable error kind, used as the Lambda `errorType`.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "ConfigError",
            Self::InvalidInput(_) => "InvalidInput",
            Self::DispatchError(_) => "DispatchError",
            Self::SerializationError(_) => "SerializationError",
        }
    }

    /// Converts the error into the diagnostic reported to the Lambda runtime.
    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic {
            error_type: self.error_type().to_string(),
            error_message: self.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::DispatchError(msg) => write!(f, "Rundeck dispatch error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}
