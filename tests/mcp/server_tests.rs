//! Message routing through `process_message`

use crate::common::{create_test_handlers, test_config, ProjectFixture};
use fsgate::mcp::error::McpError;
use fsgate::mcp::handlers::ProtocolHandlers;
use fsgate::mcp::protocol::*;
use fsgate::mcp::server::process_message;
use serde_json::Value;

fn create_handlers() -> (ProtocolHandlers, ProjectFixture) {
    let fixture = ProjectFixture::standard();
    let handlers = create_test_handlers(test_config(fixture.path()));
    (handlers, fixture)
}

#[tokio::test]
async fn test_full_session() {
    let (handlers, _fixture) = create_handlers();

    let init = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
    )
    .await
    .unwrap();
    assert_eq!(init.result.unwrap()["serverInfo"]["name"], "fsgate-mcp");

    let ack = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    )
    .await
    .unwrap();
    assert!(ack.is_empty());

    let call = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"list_service_files","arguments":{"service":"api","dirPath":"src"}}}"#,
    )
    .await
    .unwrap();
    let result = call.result.unwrap();
    let listing: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(listing["total"], 2);
}

#[tokio::test]
async fn test_parse_error() {
    let (handlers, _fixture) = create_handlers();

    let err = process_message(&handlers, "{not json").await.unwrap_err();
    assert!(matches!(err, McpError::ParseError(_)));
    assert_eq!(err.code(), PARSE_ERROR);
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let (handlers, _fixture) = create_handlers();

    let response = process_message(&handlers, r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#)
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
}

#[tokio::test]
async fn test_unknown_method() {
    let (handlers, _fixture) = create_handlers();

    let response = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","id":9,"method":"resources/list"}"#,
    )
    .await
    .unwrap();
    assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_for_unknown_request_has_no_reply() {
    let (handlers, _fixture) = create_handlers();

    let response = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{"requestId":3}}"#,
    )
    .await
    .unwrap();
    assert!(response.is_empty());
    assert_eq!(handlers.in_flight_calls(), 0);
}

#[tokio::test]
async fn test_other_notifications_ignored() {
    let (handlers, _fixture) = create_handlers();

    let response = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","method":"notifications/progress","params":{"progress":1}}"#,
    )
    .await
    .unwrap();
    assert!(response.is_empty());
}

#[tokio::test]
async fn test_completed_call_is_untracked() {
    let (handlers, _fixture) = create_handlers();

    let call = process_message(
        &handlers,
        r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"search_across_services","arguments":{"query":"TODO"}}}"#,
    )
    .await
    .unwrap();
    assert!(call.result.unwrap().get("isError").is_none());
    assert_eq!(handlers.in_flight_calls(), 0);
}
