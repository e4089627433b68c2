//! HTTP-level tests for every provider against a local mock server.

use std::time::Duration;

use llm::{provider_for, ProviderSettings};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use triage::{LlmError, ProviderKind};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ProviderSettings {
    ProviderSettings::new(SecretString::from("test-key".to_string())).with_api_base(server.uri())
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gemini_returns_first_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "classify me" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  ```json\n[\"bug\"]\n```\n" }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::Gemini, settings(&server)).unwrap();
    let reply = provider.complete("classify me").await.unwrap();

    assert_eq!(provider.name(), "Gemini");
    assert_eq!(reply, "```json\n[\"bug\"]\n```");
}

#[tokio::test]
async fn gemini_without_candidates_returns_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::Gemini, settings(&server)).unwrap();

    assert_eq!(provider.complete("classify me").await.unwrap(), "");
}

#[tokio::test]
async fn gemini_honours_model_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "[]" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(
        ProviderKind::Gemini,
        settings(&server).with_model(Some("gemini-1.5-pro".to_string())),
    )
    .unwrap();

    assert_eq!(provider.complete("x").await.unwrap(), "[]");
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn openai_sends_single_user_message_with_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4.1",
            "messages": [{ "role": "user", "content": "classify me" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "[\"feature\"]" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::OpenAi, settings(&server)).unwrap();

    assert_eq!(provider.complete("classify me").await.unwrap(), "[\"feature\"]");
}

#[tokio::test]
async fn openai_null_content_returns_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::OpenAi, settings(&server)).unwrap();

    assert_eq!(provider.complete("x").await.unwrap(), "");
}

// ---------------------------------------------------------------------------
// DeepSeek
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deepseek_adds_system_message_and_reasoner_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "deepseek-reasoner",
            "messages": [
                { "role": "system", "content": "You are a helpful assistant." },
                { "role": "user", "content": "classify me" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "[\"question\"]" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::DeepSeek, settings(&server)).unwrap();

    assert_eq!(provider.name(), "DeepSeek");
    assert_eq!(provider.complete("classify me").await.unwrap(), "[\"question\"]");
}

// ---------------------------------------------------------------------------
// Failure mapping (shared by all providers)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_success_status_carries_code_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"bad key"}}"#),
        )
        .mount(&server)
        .await;

    for kind in ProviderKind::PREFERENCE {
        let provider = provider_for(kind, settings(&server)).unwrap();
        let err = provider.complete("x").await.unwrap_err();

        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, r#"{"error":{"message":"bad key"}}"#);
            }
            other => panic!("{kind}: expected status error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn slow_response_is_reported_as_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let provider = provider_for(
        ProviderKind::OpenAi,
        settings(&server).with_timeout(Duration::from_millis(50)),
    )
    .unwrap();

    assert!(matches!(
        provider.complete("x").await,
        Err(LlmError::Timeout)
    ));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(ProviderKind::Gemini, settings(&server)).unwrap();

    assert!(matches!(
        provider.complete("x").await,
        Err(LlmError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let settings = ProviderSettings::new(SecretString::from("test-key".to_string()))
        .with_api_base("http://127.0.0.1:9");

    let provider = provider_for(ProviderKind::DeepSeek, settings).unwrap();

    assert!(matches!(
        provider.complete("x").await,
        Err(LlmError::Transport { .. })
    ));
}
