//! Error types and error handling for the fsgate file gateway.
//!
//! This module defines the error types used throughout the core.
//! Every variant maps onto exactly one wire-level error code; the
//! mapping lives here so adapters (MCP, CLI) never have to guess.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error codes carried by the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidParams,
    AccessDenied,
    NotFound,
    Truncated,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidParams => "INVALID_PARAMS",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Truncated => "TRUNCATED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a caller-supplied path is refused.
///
/// Messages are shown to callers, so they describe the rule that was
/// broken and never include host filesystem paths.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathViolation {
    #[error("path is empty")]
    Empty,

    #[error("path contains a NUL byte")]
    NulByte,

    #[error("path contains a parent-directory segment")]
    Traversal,

    #[error("absolute paths are not allowed")]
    Absolute,

    #[error("hidden path segment '{0}' is not allowed")]
    Hidden(String),

    #[error("'{0}' is blocked by policy")]
    Blocked(String),

    #[error("path resolves outside the service root")]
    Escape,

    #[error("path could not be resolved")]
    Unresolvable,
}

/// Main error type for the gateway core
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] PathViolation),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Truncated: {0}")]
    Truncated(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Message returned to callers for anything that maps to INTERNAL_ERROR
pub const GENERIC_INTERNAL_MESSAGE: &str = "internal error while processing the request";

impl GatewayError {
    /// Wire-level error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidParams(_) => ErrorCode::InvalidParams,
            GatewayError::AccessDenied(_) => ErrorCode::AccessDenied,
            GatewayError::NotFound(_) => ErrorCode::NotFound,
            GatewayError::Truncated(_) => ErrorCode::Truncated,
            GatewayError::Internal(_)
            | GatewayError::ConfigError(_)
            | GatewayError::IoError(_)
            | GatewayError::SerdeError(_)
            | GatewayError::TomlError(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to hand to a caller.
    ///
    /// Internal failures collapse to a generic message: I/O and parser
    /// errors routinely embed absolute host paths.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::InvalidParams(msg)
            | GatewayError::NotFound(msg)
            | GatewayError::Truncated(msg) => msg.clone(),
            GatewayError::AccessDenied(violation) => violation.to_string(),
            _ => GENERIC_INTERNAL_MESSAGE.to_string(),
        }
    }

    /// Check if this error is reported as INTERNAL_ERROR
    pub fn is_internal(&self) -> bool {
        self.code() == ErrorCode::InternalError
    }
}
