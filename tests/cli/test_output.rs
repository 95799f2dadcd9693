//! Output helper tests

use fsgate::cli::output::{format_bytes, format_relative_time, unwrap_response};
use fsgate::cli::OutputFormat;
use fsgate::core::error::ErrorCode;
use fsgate::gateway::OperationResponse;
use fsgate::Redactor;

#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(262_144), "256.0 KB");
}

#[test]
fn test_format_relative_time() {
    let now = chrono::Utc::now();
    assert_eq!(format_relative_time(&now), "just now");
    assert_eq!(
        format_relative_time(&(now - chrono::Duration::hours(3))),
        "3h ago"
    );
    assert_eq!(
        format_relative_time(&(now + chrono::Duration::hours(1))),
        "in the future"
    );
}

#[test]
fn test_unwrap_response_json_prints_envelope_only() {
    let response = OperationResponse::success(Redactor::global().seal("body"));
    assert_eq!(unwrap_response(response, OutputFormat::Json).unwrap(), None);
}

#[test]
fn test_unwrap_response_keeps_every_block() {
    let redactor = Redactor::global();
    let response = OperationResponse::Success {
        content: vec![
            fsgate::gateway::TextContent {
                text: redactor.seal("body"),
            },
            fsgate::gateway::TextContent {
                text: redactor.seal("[truncated]"),
            },
        ],
    };

    let texts = unwrap_response(response, OutputFormat::Human)
        .unwrap()
        .unwrap();
    assert_eq!(texts, vec!["body", "[truncated]"]);
}

#[test]
fn test_unwrap_response_error_message_is_redacted() {
    let response = OperationResponse::failure(ErrorCode::InvalidParams, "bad api_key=abc123");
    let err = unwrap_response(response, OutputFormat::Human).unwrap_err();
    assert_eq!(err.to_string(), "INVALID_PARAMS: bad api_key=[REDACTED]");
}
