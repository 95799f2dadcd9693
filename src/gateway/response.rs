//! Response envelope
//!
//! Success: `{"content": [{"text": ...}]}`
//! Failure: `{"error": {"code": ..., "message": ...}}`
//!
//! Both variants carry only [`RedactedText`], so every string that
//! leaves the gateway has been through the redactor.

use crate::core::error::{ErrorCode, GatewayError};
use crate::core::redact::{RedactedText, Redactor};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub text: RedactedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: RedactedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationResponse {
    Success { content: Vec<TextContent> },
    Failure { error: ErrorBody },
}

impl OperationResponse {
    pub fn success(text: RedactedText) -> Self {
        OperationResponse::Success {
            content: vec![TextContent { text }],
        }
    }

    pub fn failure(code: ErrorCode, message: &str) -> Self {
        OperationResponse::Failure {
            error: ErrorBody {
                code,
                message: Redactor::global().seal(message),
            },
        }
    }

    /// Envelope for a gateway error, using its public message
    pub fn from_error(err: &GatewayError) -> Self {
        Self::failure(err.code(), &err.public_message())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, OperationResponse::Failure { .. })
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            OperationResponse::Failure { error } => Some(error.code),
            OperationResponse::Success { .. } => None,
        }
    }

    /// Text blocks of a success, or the error message
    pub fn texts(&self) -> Vec<&str> {
        match self {
            OperationResponse::Success { content } => {
                content.iter().map(|c| c.text.as_str()).collect()
            }
            OperationResponse::Failure { error } => vec![error.message.as_str()],
        }
    }

    /// Serialized envelope
    pub fn to_json(&self) -> String {
        // Serializing strings and enums cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
