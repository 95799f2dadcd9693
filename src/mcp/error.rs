//! MCP-specific error types
//!
//! Protocol-level failures only. Gateway errors never become JSON-RPC
//! errors: they are returned as tool results with `isError: true`.

use crate::mcp::protocol::{INTERNAL_ERROR, INVALID_PARAMS, PARSE_ERROR};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::Io(_) | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    /// Message sent to the client; I/O detail stays in the logs
    pub fn client_message(&self) -> String {
        match self {
            McpError::Io(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}
