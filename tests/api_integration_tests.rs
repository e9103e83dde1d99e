//! Integration Tests for Gateway Endpoints
//!
//! Drives the gateway router with `oneshot` requests while a mock tutor
//! backend answers upstream.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::{MockBackend, CHAT, SCREEN, VISION};
use serde_json::Value;
use tower::ServiceExt;
use tutor_gateway::{api::create_router, ApiClient, AppState};

// == Helper Functions ==

async fn create_test_app() -> (Router, MockBackend) {
    let (backend, base) = MockBackend::start().await;
    let app = create_router(AppState::new(ApiClient::new(&base)));
    (app, backend)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

const BOUNDARY: &str = "tutor-test-boundary";

fn multipart_image(bytes: &[u8], language: &str) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"board.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"language\"\r\n\r\n");
    body.extend_from_slice(language.as_bytes());
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/vision/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

// == Chat Endpoint Tests ==

#[tokio::test]
async fn test_chat_endpoint_caches_repeat_requests() {
    let (app, backend) = create_test_app().await;
    let body = r#"{"message":"What is gravity?","language":"en"}"#;

    let first = app.clone().oneshot(post_json("/api/chat/respond", body)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["response"], "Answer to: What is gravity?");

    // Same fields, different order
    let reordered = r#"{"language":"en","message":"What is gravity?"}"#;
    let second = app.clone().oneshot(post_json("/api/chat/respond", reordered)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(backend.calls(CHAT), 1);

    let stats = app.oneshot(get("/api/cache/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["size"], 1);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
}

#[tokio::test]
async fn test_chat_endpoint_empty_message() {
    let (app, backend) = create_test_app().await;

    let response = app
        .oneshot(post_json("/api/chat/respond", r#"{"message":"","language":"en"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].as_str().unwrap().contains("empty"));
    assert_eq!(backend.calls(CHAT), 0);
}

#[tokio::test]
async fn test_chat_endpoint_invalid_json() {
    let (app, backend) = create_test_app().await;

    let response = app
        .oneshot(post_json("/api/chat/respond", r#"{"invalid json"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].as_str().unwrap().starts_with("Invalid input"));
    assert_eq!(backend.calls(CHAT), 0);
}

#[tokio::test]
async fn test_chat_endpoint_missing_field_uses_detail_body() {
    let (app, _backend) = create_test_app().await;

    let response = app
        .oneshot(post_json("/api/chat/respond", r#"{"language":"en"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].as_str().unwrap().contains("message"));
}

#[tokio::test]
async fn test_language_codes_are_sent_as_names() {
    let (app, backend) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(post_json("/api/chat/respond", r#"{"message":"hi","language":"ta"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.bodies(CHAT)[0]["language"], "Tamil");

    // Code and name share a cache entry
    app.clone()
        .oneshot(post_json("/api/chat/respond", r#"{"message":"hi","language":"Tamil"}"#))
        .await
        .unwrap();
    assert_eq!(backend.calls(CHAT), 1);

    // Free-form names pass through
    app.oneshot(post_json(
        "/api/chat/respond",
        r#"{"message":"hi","language":"Kannada"}"#,
    ))
    .await
    .unwrap();
    assert_eq!(backend.bodies(CHAT)[1]["language"], "Kannada");
}

#[tokio::test]
async fn test_upstream_error_is_relayed() {
    let (app, backend) = create_test_app().await;
    backend.fail_with(500, r#"{"detail":"Error generating response: quota exceeded"}"#);

    let body = r#"{"message":"hi","language":"en"}"#;
    let response = app.clone().oneshot(post_json("/api/chat/respond", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["detail"], "Error generating response: quota exceeded");

    // Failure was not cached
    backend.recover();
    let response = app.oneshot(post_json("/api/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls(CHAT), 2);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let app = create_router(AppState::new(ApiClient::new(&format!("http://{}", addr))));

    let response = app
        .oneshot(post_json("/api/chat/respond", r#"{"message":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("detail").is_some());
}

// == Vision Endpoint Tests ==

#[tokio::test]
async fn test_vision_endpoint_caches_identical_images() {
    let (app, backend) = create_test_app().await;
    let image = b"\x89PNG\r\n\x1a\nchalkboard";

    let response = app.clone().oneshot(multipart_image(image, "en")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["language"], "English");

    let response = app.clone().oneshot(multipart_image(image, "en")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls(VISION), 1);

    let response = app.oneshot(multipart_image(image, "ml")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls(VISION), 2);
}

#[tokio::test]
async fn test_vision_endpoint_missing_file() {
    let (app, backend) = create_test_app().await;

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"language\"\r\n\r\nen\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/vision/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.calls(VISION), 0);
}

#[tokio::test]
async fn test_vision_endpoint_requires_multipart() {
    let (app, backend) = create_test_app().await;

    let response = app
        .oneshot(post_json("/api/vision/analyze", r#"{"file":"abc"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("detail").is_some());
    assert_eq!(backend.calls(VISION), 0);
}

// == Uncached Endpoint Tests ==

#[tokio::test]
async fn test_screen_frame_endpoint_not_cached() {
    let (app, backend) = create_test_app().await;
    let body = r#"{"frame":"data:image/jpeg;base64,/9j/AAAA","language":"en"}"#;

    for _ in 0..2 {
        let response = app.clone().oneshot(post_json("/api/screen/frame", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(backend.calls(SCREEN), 2);
    assert_eq!(backend.bodies(SCREEN)[0]["frame"], "/9j/AAAA");
}

#[tokio::test]
async fn test_avatar_endpoint() {
    let (app, _backend) = create_test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/heygen/avatar",
            r#"{"text":"Welcome to class","language":"en"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["session_id"], "session-1");
}

#[tokio::test]
async fn test_file_endpoint_unsupported_type() {
    let (app, _backend) = create_test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/chat/respond/file",
            r#"{"file":"UEsDBBQ=","fileName":"a.zip","fileType":"application/zip","language":"en"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["detail"].as_str().unwrap().contains("application/zip"));
}

#[tokio::test]
async fn test_file_endpoint_success() {
    let (app, _backend) = create_test_app().await;

    let response = app
        .oneshot(post_json(
            "/api/chat/respond/file",
            r#"{"file":"bGVzc29uIG5vdGVz","fileName":"notes.txt","fileType":"text/plain","language":"en"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["fileName"], "notes.txt");
}

// == Health and Cache Admin Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _backend) = create_test_app().await;

    let response = app.oneshot(get("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["upstream"], "ok");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_cache_clear_and_cleanup_endpoints() {
    let (app, backend) = create_test_app().await;
    let body = r#"{"message":"hi","language":"en"}"#;

    app.clone().oneshot(post_json("/api/chat/respond", body)).await.unwrap();

    let response = app
        .clone()
        .oneshot(post_json("/api/cache/cleanup", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["removed"], 0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["cleared"], 1);

    let stats = app.clone().oneshot(get("/api/cache/stats")).await.unwrap();
    assert_eq!(body_to_json(stats.into_body()).await["size"], 0);

    app.oneshot(post_json("/api/chat/respond", body)).await.unwrap();
    assert_eq!(backend.calls(CHAT), 2);
}

#[tokio::test]
async fn test_languages_endpoint() {
    let (app, _backend) = create_test_app().await;

    let response = app.oneshot(get("/api/languages")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    let languages = json["languages"].as_array().unwrap();
    assert_eq!(languages.len(), 14);
    assert_eq!(languages[1]["code"], "ta");
    assert_eq!(languages[1]["nativeName"], "தமிழ்");
}
