//! Exercises the OpenAI client against a local stand-in server.

use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use vocalis_llm::{ChatClient, ChatOptions, ChatRequest, Message, OpenAIClient};

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

#[tokio::test]
async fn test_chat_parses_completion() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let user = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
            Json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 0,
                "model": body["model"],
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": format!("You said: {}", user) },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
            }))
        }),
    );
    let base_url = spawn_server(router).await;

    let client = OpenAIClient::new("sk-test").unwrap().with_base_url(base_url);
    let request = ChatRequest::new(
        "gpt-4o-mini",
        vec![Message::system("be brief"), Message::human("hello")],
    )
    .with_options(ChatOptions::new().temperature(0.7).max_tokens(300));

    let response = client.chat(request).await.unwrap();
    assert_eq!(response.text(), Some("You said: hello"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.unwrap().total_tokens, 16);
}

#[tokio::test]
async fn test_chat_surfaces_api_errors() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "message": "Incorrect API key provided" } })),
            )
        }),
    );
    let base_url = spawn_server(router).await;

    let client = OpenAIClient::new("sk-wrong").unwrap().with_base_url(base_url);
    let err = client
        .chat(ChatRequest::new("gpt-4o-mini", vec![Message::human("hello")]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_hung_upstream_times_out() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Json(json!({}))
        }),
    );
    let base_url = spawn_server(router).await;

    let client = OpenAIClient::with_timeout("sk-test", Duration::from_millis(200))
        .unwrap()
        .with_base_url(base_url);

    let started = Instant::now();
    let result = client
        .chat(ChatRequest::new("gpt-4o-mini", vec![Message::human("hello")]))
        .await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
}
