use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use docchat_api::{
    app::build_router,
    config::{Config, StorageBackend},
    state::AppState,
};
use mockito::Matcher;
use serde_json::{json, Value};
use tower::ServiceExt;

fn prompt_only(prompt: &str) -> Request<Body> {
    let boundary = "wiring-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\n{prompt}\r\n--{boundary}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn config_for(server: &mockito::Server) -> Config {
    let mut config = Config::default();
    config.api_key = "sk-test".to_string();
    config.api_url = format!("{}/chat/completions", server.url());
    config
}

#[tokio::test]
async fn test_from_config_calls_chat_api_with_configured_model() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "deepseek-chat",
            "temperature": 0.7,
            "max_tokens": 2000
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "message": {"role": "assistant", "content": "Nothing attached, but hello!"},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.storage.backend = StorageBackend::Memory;

    let state = Arc::new(AppState::from_config(config).await.unwrap());
    let app = build_router(state.clone());

    let response = app.oneshot(prompt_only("Hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["response"], "Nothing attached, but hello!");
    assert_eq!(body["conversation_id"], 1);

    mock.assert_async().await;
    assert_eq!(state.store.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_json_backend_persists_to_configured_path() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Stored."}}]}"#)
        .create_async()
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("data").join("db.json");

    let mut config = config_for(&server);
    config.storage.path = path.clone();

    let state = Arc::new(AppState::from_config(config).await.unwrap());
    let response = build_router(state)
        .oneshot(prompt_only("Remember this"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let saved = saved.as_array().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["prompt"], "Remember this");
    assert_eq!(saved[0]["response"], "Stored.");
    assert_eq!(saved[0]["document_text"], "No document provided.");
}

#[tokio::test]
async fn test_upstream_error_is_embedded_in_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Authentication Fails"}}"#)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.storage.backend = StorageBackend::Memory;

    let state = Arc::new(AppState::from_config(config).await.unwrap());
    let response = build_router(state.clone())
        .oneshot(prompt_only("Hi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let text = body["response"].as_str().unwrap();
    assert!(text.starts_with("Error calling DeepSeek API: "));
    assert!(text.contains("401"));

    let stored = state.store.list().await.unwrap();
    assert_eq!(stored[0].response, text);
}

#[tokio::test]
async fn test_from_config_rejects_missing_key() {
    let mut config = Config::default();
    config.api_url = "http://127.0.0.1:9/chat/completions".to_string();
    config.storage.backend = StorageBackend::Memory;

    assert!(AppState::from_config(config).await.is_err());
}

#[tokio::test]
async fn test_surfaced_upstream_error_names_configured_provider() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.storage.backend = StorageBackend::Memory;
    config.chat.embed_failures = false;
    config.llm.provider = "Acme".to_string();

    let state = Arc::new(AppState::from_config(config).await.unwrap());
    let response = build_router(state.clone())
        .oneshot(prompt_only("Hi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Error calling Acme API: "));
    assert_eq!(state.store.len().await.unwrap(), 0);
}
