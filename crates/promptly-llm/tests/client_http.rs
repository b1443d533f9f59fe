//! Chat-completion client against a mock provider.

use std::time::Duration;

use httpmock::Method::POST;
use httpmock::MockServer;
use promptly_llm::{ChatClient, ChatMessage, ChatSettings, CompletionBackend, LlmError};
use serde_json::json;

fn client(server: &MockServer) -> ChatClient {
    ChatClient::new(ChatSettings {
        base_url: server.url("/v1"),
        api_key: "sk-test-key".into(),
        model: "gpt-4".into(),
        temperature: 0.7,
        max_tokens: 2048,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are an expert prompt optimizer."),
        ChatMessage::user("write a story"),
    ]
}

#[tokio::test]
async fn sends_bearer_token_and_openai_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test-key")
                .json_body(json!({
                    "model": "gpt-4",
                    "messages": [
                        {"role": "system", "content": "You are an expert prompt optimizer."},
                        {"role": "user", "content": "write a story"}
                    ],
                    "temperature": 0.7,
                    "max_tokens": 2048
                }));
            then.status(200).json_body(json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "  A story.  \n"}, "finish_reason": "stop"}
                ]
            }));
        })
        .await;

    let reply = client(&server).complete(messages()).await.unwrap();
    mock.assert_async().await;
    assert_eq!(reply, "A story.");
}

#[tokio::test]
async fn api_error_carries_provider_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).json_body(json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
            }));
        })
        .await;

    let err = client(&server).complete(messages()).await.unwrap_err();
    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rate_limit_is_reported_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).header("retry-after", "17");
        })
        .await;

    let err = client(&server).complete(messages()).await.unwrap_err();
    assert!(matches!(
        err,
        LlmError::RateLimited {
            retry_after_secs: 17
        }
    ));
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn empty_choices_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        })
        .await;

    let err = client(&server).complete(messages()).await.unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let err = client(&server).complete(messages()).await.unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = ChatClient::new(ChatSettings {
        base_url: "http://127.0.0.1:9/v1".into(),
        api_key: "sk-test-key".into(),
        model: "gpt-4".into(),
        temperature: 0.7,
        max_tokens: 16,
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.complete(messages()).await.unwrap_err();
    assert!(matches!(err, LlmError::Http(_)));
    assert!(err.is_transport());
}
