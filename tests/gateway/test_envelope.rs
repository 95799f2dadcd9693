//! Serialized response envelopes

use crate::common::{create_test_dispatcher, first_text, ProjectFixture};
use serde_json::{json, Value};

#[tokio::test]
async fn test_success_envelope_has_only_content() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    let response = dispatcher
        .dispatch("read", &json!({"service": "api", "filePath": "src/server.rs"}))
        .await;
    let envelope: Value = serde_json::from_str(&response.to_json()).unwrap();

    let object = envelope.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert!(envelope["content"][0]["text"].is_string());
}

#[tokio::test]
async fn test_failure_envelope_has_code_and_message() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    let response = dispatcher
        .dispatch("read", &json!({"service": "api", "filePath": "../notes.txt"}))
        .await;
    let envelope: Value = serde_json::from_str(&response.to_json()).unwrap();

    assert_eq!(envelope.as_object().unwrap().len(), 1);
    assert_eq!(envelope["error"]["code"], "ACCESS_DENIED");
    assert_eq!(
        envelope["error"]["message"],
        "path contains a parent-directory segment"
    );
}

#[tokio::test]
async fn test_structured_output_stays_valid_json_when_redacted() {
    let fixture = ProjectFixture::standard();
    fixture.write("frontend/access_token=abc123.txt", "x\n");
    let dispatcher = create_test_dispatcher(fixture.path());

    let response = dispatcher.dispatch("list", &json!({"service": "frontend"})).await;
    let text = first_text(&response);
    let listing: Value = serde_json::from_str(&text).unwrap();

    assert!(!text.contains("abc123"));
    let names: Vec<&str> = listing["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"access_token=[REDACTED]"));
}

#[tokio::test]
async fn test_search_output_stays_valid_json_with_secrets() {
    let fixture = ProjectFixture::standard();
    let dispatcher = create_test_dispatcher(fixture.path());

    let response = dispatcher
        .dispatch("search", &json!({"query": "api_key", "service": "frontend"}))
        .await;
    let text = first_text(&response);
    let outcome: Value = serde_json::from_str(&text).unwrap();

    // config.txt matches; .env is hidden
    assert_eq!(outcome["total"], 1);
    assert_eq!(outcome["results"][0]["path"], "config.txt");
    assert_eq!(outcome["results"][0]["snippet"], "api_key=[REDACTED]");
    assert!(!text.contains("abc123"));
}
