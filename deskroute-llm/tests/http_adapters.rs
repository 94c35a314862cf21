//! Adapter tests against a local mock HTTP server.

use deskroute_core::{BackendConfig, ConversationTurn, DeskError, LlmError, ProviderKind};
use deskroute_llm::{build_backend, BackendReply, GenerationRequest};

fn request() -> GenerationRequest {
    GenerationRequest {
        system_instructions: "Ты агент поддержки".to_string(),
        history: vec![ConversationTurn::user("Привет")],
        current_message: "Хочу вернуть деньги".to_string(),
        tools: vec![],
        scratchpad: vec![],
    }
}

fn config(provider: ProviderKind, base_url: String) -> BackendConfig {
    let mut config = BackendConfig::new(provider, "test-key");
    config.base_url = Some(base_url);
    config.timeout_secs = 5;
    config.requests_per_minute = 6000;
    config
}

#[tokio::test]
async fn test_gemini_returns_function_call() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-2.0-flash-exp:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"functionCall":{"name":"refund","args":{"reason":"курс не подошел"}}}
            ]}}]}"#,
        )
        .create_async()
        .await;

    let backend = build_backend(&config(ProviderKind::Gemini, server.url())).unwrap();
    let reply = backend.respond(&request()).await.unwrap();

    match reply {
        BackendReply::ToolCalls(calls) => assert_eq!(calls[0].name, "refund"),
        other => panic!("expected tool call, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_openai_returns_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"Расскажите подробнее о причине."},"finish_reason":"stop"}]}"#,
        )
        .create_async()
        .await;

    let backend = build_backend(&config(ProviderKind::OpenAi, server.url())).unwrap();
    let reply = backend.respond(&request()).await.unwrap();

    assert_eq!(
        reply,
        BackendReply::Text("Расскажите подробнее о причине.".to_string())
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_maps_to_llm_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("retry-after", "3")
        .with_body(r#"{"error":{"message":"quota exceeded","type":"requests"}}"#)
        .create_async()
        .await;

    let backend = build_backend(&config(ProviderKind::OpenAi, server.url())).unwrap();
    let err = backend.respond(&request()).await.unwrap_err();

    assert!(matches!(
        err,
        DeskError::GenerationUnavailable(LlmError::RateLimited { retry_after_ms: 3000, .. })
    ));
}

#[tokio::test]
async fn test_server_error_carries_provider_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/models/gemini-2.0-flash-exp:generateContent")
        .with_status(403)
        .with_body(r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#)
        .create_async()
        .await;

    let backend = build_backend(&config(ProviderKind::Gemini, server.url())).unwrap();
    let err = backend.respond(&request()).await.unwrap_err();

    match err {
        DeskError::GenerationUnavailable(LlmError::RequestFailed { status, message, .. }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_request_failure() {
    let backend =
        build_backend(&config(ProviderKind::OpenAi, "http://127.0.0.1:9".to_string())).unwrap();
    let err = backend.respond(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        DeskError::GenerationUnavailable(LlmError::RequestFailed { status: 0, .. })
    ));
}
