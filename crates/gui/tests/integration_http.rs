//! HttpBackend against a local axum server standing in for the AI backend.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use shared::{ChatRequest, GenerateCodeRequest, OptimizeRequest};
use three_ai_lib::backend::{self, BackendError, HttpBackend};
use three_ai_lib::state::chat::{ChatOp, ChatRole, ChatState};

async fn chat(Json(body): Json<Value>) -> Json<Value> {
    let message = body["message"].as_str().unwrap_or_default();
    let context = body["context"].as_str().unwrap_or_default();
    Json(json!({ "response": format!("[{context}] {message}") }))
}

async fn generate_code(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["type"] != "threejs-scene" || body["complexity"] != "intermediate" {
        return Err(StatusCode::BAD_REQUEST);
    }
    let prompt = body["prompt"].as_str().unwrap_or_default();
    Ok(Json(json!({ "code": format!("// {prompt}") })))
}

async fn optimize(Json(body): Json<Value>) -> Json<Value> {
    let code = body["code"].as_str().unwrap_or_default();
    Json(json!({
        "optimizedCode": code.to_uppercase(),
        "explanation": format!("{} for {}", body["issue"], body["target"]),
    }))
}

async fn fail() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn not_json() -> &'static str {
    "<html>upstream error</html>"
}

async fn wrong_shape() -> Json<Value> {
    Json(json!({ "answer": "missing the response field" }))
}

fn app() -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/generate-code", post(generate_code))
        .route("/api/optimize", post(optimize))
        .route("/broken/api/chat", post(fail))
        .route("/html/api/chat", post(not_json))
        .route("/shape/api/chat", post(wrong_shape))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn ask(message: &str) -> ChatRequest {
    ChatRequest {
        message: message.into(),
        context: "webgl".into(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_chat_round_trip() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&base);

    let resp = backend::call(&client, &ask("hello")).await.unwrap();
    assert_eq!(resp.response, "[webgl] hello");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_trailing_slash_in_base_url() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&format!("{base}/"));
    assert_eq!(client.endpoint_url("/api/chat"), format!("{base}/api/chat"));

    let resp = backend::call(&client, &ask("hi")).await.unwrap();
    assert_eq!(resp.response, "[webgl] hi");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_code_wire_format() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&base);

    let request = GenerateCodeRequest::threejs_scene("a cube");
    let resp = backend::call(&client, &request).await.unwrap();
    assert_eq!(resp.code, "// a cube");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_optimize_wire_format() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&base);

    let request = OptimizeRequest::performance("let x;");
    let resp = backend::call(&client, &request).await.unwrap();
    assert_eq!(resp.optimized_code, "LET X;");
    assert_eq!(resp.explanation, "\"performance\" for \"web\"");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_status() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&format!("{base}/broken"));

    let err = backend::call(&client, &ask("hello")).await.unwrap_err();
    assert_eq!(err, BackendError::Status(500));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_route_is_status() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&format!("{base}/nowhere"));

    let err = backend::call(&client, &ask("hello")).await.unwrap_err();
    assert_eq!(err, BackendError::Status(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_json_body_is_decode_error() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&format!("{base}/html"));

    let err = backend::call(&client, &ask("hello")).await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wrong_shape_is_decode_error() {
    let base = serve(app()).await;
    let client = HttpBackend::new(&format!("{base}/shape"));

    let err = backend::call(&client, &ask("hello")).await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)), "got {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_refused_connection_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpBackend::new(&format!("http://{addr}"));
    let err = backend::call(&client, &ask("hello")).await.unwrap_err();
    assert!(matches!(err, BackendError::Network(_)), "got {err:?}");
}

#[test]
fn test_chat_state_over_http() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let base = rt.block_on(serve(app()));

    let mut chat = ChatState::new(Arc::new(HttpBackend::new(&base)), rt.handle().clone(), "shaders");
    chat.input = "what is a uniform?".into();
    chat.send_message();
    assert!(chat.wait_for_response(Duration::from_secs(10)));

    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[1].role, ChatRole::Assistant);
    assert_eq!(chat.messages[1].text, "[shaders] what is a uniform?");

    // Same state, now pointed at a failing backend
    chat.set_backend(Arc::new(HttpBackend::new(&format!("{base}/broken"))));
    chat.input = "again".into();
    chat.send_message();
    assert!(chat.wait_for_response(Duration::from_secs(10)));

    let last = chat.messages.last().unwrap();
    assert!(last.is_error);
    assert_eq!(last.text, ChatOp::Chat.error_message());
}
