//! In-process mock of the chat backend, served by axum on an ephemeral port.

#![allow(dead_code)]

use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use chatgrid::api::ApiClient;
use chatgrid::store::AuthStore;

pub const TOKEN: &str = "test-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false)
}

fn user_json(premium: bool) -> Value {
    json!({
        "email": "ada@example.com",
        "fullName": "Ada Lovelace",
        "isPremium": premium,
        "credits": 10
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        let mut payload = user_json(false);
        payload["token"] = json!(TOKEN);
        Json(payload).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"message": "Invalid credentials"}))).into_response()
    }
}

async fn me(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(user_json(false)).into_response()
}

/// Echoes the prompt back. `slow` sleeps first, `broken` fails with a JSON
/// error body.
async fn send(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let model = body["aiModel"].as_str().unwrap_or_default().to_string();
    match model.as_str() {
        "broken" => {
            return (StatusCode::BAD_GATEWAY, Json(json!({"error": "upstream down"})))
                .into_response()
        }
        "slow" => tokio::time::sleep(Duration::from_millis(150)).await,
        _ => {}
    }
    Json(json!({
        "id": format!("resp-{model}"),
        "content": format!("{model} says: {}", body["message"].as_str().unwrap_or_default()),
        "aiModel": model,
        "conversationId": body["conversationId"],
        "timestamp": "2025-03-01T10:00:00.123",
        "metrics": {"responseTimeMs": 400, "wordCount": 50, "tokensPerSecond": 162.5}
    }))
    .into_response()
}

async fn create_conversation(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    // the real backend sometimes answers with an empty 200
    if body["aiModel"] == "grok" {
        return StatusCode::OK.into_response();
    }
    Json(json!({
        "id": "remote-1",
        "aiModel": body["aiModel"],
        "messages": [],
        "createdAt": "2025-03-01T09:00:00Z",
        "updatedAt": "2025-03-01T09:00:00Z"
    }))
    .into_response()
}

async fn get_conversation(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if id != "remote-1" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Conversation not found"})))
            .into_response();
    }
    Json(json!({
        "id": "remote-1",
        "aiModel": "gpt5",
        "messages": [
            {"id": "m1", "content": "hi", "aiModel": "user", "conversationId": "remote-1",
             "timestamp": "2025-03-01T09:00:00", "isUser": true},
            {"id": "m2", "content": "hello there", "aiModel": "gpt5", "conversationId": "remote-1",
             "timestamp": "2025-03-01T09:00:01Z",
             "metrics": {"responseTimeMs": 900, "wordCount": 2, "tokensPerSecond": 2.9}}
        ],
        "createdAt": "2025-03-01T09:00:00Z",
        "updatedAt": "2025-03-01T09:00:01Z"
    }))
    .into_response()
}

async fn delete_conversation(headers: HeaderMap, Path(_id): Path<String>) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    StatusCode::NO_CONTENT
}

async fn analyze(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["prompt"] == "expensive prompt" {
        return (StatusCode::PAYMENT_REQUIRED, Json(json!({"message": "No credits left"})))
            .into_response();
    }
    Json(json!({
        "score": 4,
        "critique": "Add context.",
        "optimizedPrompt": format!("Explain in detail: {}", body["prompt"].as_str().unwrap_or_default()),
        "canImprove": true
    }))
    .into_response()
}

async fn feedback(Json(body): Json<Value>) -> StatusCode {
    if body["type"] == "bug" && body.get("contactInfo").is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/chat/send", post(send))
        .route("/api/conversations", post(create_conversation))
        .route(
            "/api/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/api/prompt/analyze", post(analyze))
        .route("/api/feedback", post(feedback))
}

/// Starts the mock and returns its `/api` base URL.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub async fn client(auth: AuthStore) -> ApiClient {
    let base = spawn_backend().await;
    ApiClient::new(&base, Duration::from_secs(5), auth).unwrap()
}
