//! Error types and handling for the X MCP server

use serde::Serialize;
use std::fmt;

/// Application error types
///
/// Every failure a tool can produce maps onto one of these; the dispatcher
/// turns them into the `error` half of the result envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AppError {
    /// Caller input did not match the tool's declared schema
    InvalidArgument(String),
    /// Login or session probe failed, or the platform rejected the session
    AuthenticationFailure(String),
    /// The platform rejected or failed the requested action
    RemoteOperationFailure {
        status: Option<u16>,
        message: String,
    },
    /// Session Store read/write error
    PersistenceFailure(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            AppError::AuthenticationFailure(msg) => write!(f, "Authentication failed: {}", msg),
            AppError::RemoteOperationFailure {
                status: Some(status),
                message,
            } => write!(f, "Remote operation failed (HTTP {}): {}", status, message),
            AppError::RemoteOperationFailure {
                status: None,
                message,
            } => write!(f, "Remote operation failed: {}", message),
            AppError::PersistenceFailure(msg) => write!(f, "Session persistence failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Shorthand for a remote failure without an HTTP status
    pub fn remote(message: impl Into<String>) -> Self {
        AppError::RemoteOperationFailure {
            status: None,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    /// Stable error kind name used in result envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "InvalidArgument",
            AppError::AuthenticationFailure(_) => "AuthenticationFailure",
            AppError::RemoteOperationFailure { .. } => "RemoteOperationFailure",
            AppError::PersistenceFailure(_) => "PersistenceFailure",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get the error code for logs and process exit mapping
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "invalid_argument",
            AppError::AuthenticationFailure(_) => "authentication_failure",
            AppError::RemoteOperationFailure { .. } => "remote_operation_failure",
            AppError::PersistenceFailure(_) => "persistence_failure",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// The message without the kind prefix
    pub fn detail(&self) -> &str {
        match self {
            AppError::InvalidArgument(msg)
            | AppError::AuthenticationFailure(msg)
            | AppError::PersistenceFailure(msg)
            | AppError::Internal(msg) => msg,
            AppError::RemoteOperationFailure { message, .. } => message,
        }
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Transport-level failures never reached the platform's application logic
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        AppError::RemoteOperationFailure { status, message }
    }
}

/// A response body we could not decode is a platform-side failure
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::remote(format!("malformed response: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::PersistenceFailure(err.to_string())
    }
}
