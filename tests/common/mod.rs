//! Mock tutor backend for integration tests
//!
//! An axum server on an ephemeral port that answers the tutor API contract,
//! counts calls per endpoint and can be told to fail.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub const CHAT: &str = "/api/chat/respond";
pub const VISION: &str = "/api/vision/analyze";
pub const FILE: &str = "/api/chat/respond/file";
pub const AVATAR: &str = "/api/heygen/avatar";
pub const SCREEN: &str = "/api/screen/frame";
pub const HEALTH: &str = "/api/health";

#[derive(Default)]
struct Inner {
    calls: HashMap<&'static str, usize>,
    bodies: HashMap<&'static str, Vec<Value>>,
    /// Canned (status, raw body) returned instead of a normal answer
    failure: Option<(u16, String)>,
    /// Answer chat requests with `success: false`
    unsuccessful: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    /// Starts the mock on 127.0.0.1 and returns it with its base URL.
    pub async fn start() -> (Self, String) {
        let backend = MockBackend::default();

        let app = Router::new()
            .route(CHAT, post(chat))
            .route(VISION, post(vision))
            .route(FILE, post(file))
            .route(AVATAR, post(avatar))
            .route(SCREEN, post(screen))
            .route(HEALTH, get(health))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (backend, format!("http://{}", addr))
    }

    pub fn calls(&self, path: &str) -> usize {
        self.inner.lock().unwrap().calls.get(path).copied().unwrap_or(0)
    }

    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .bodies
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_with(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().failure = Some((status, body.to_string()));
    }

    pub fn recover(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.failure = None;
        inner.unsuccessful = false;
    }

    pub fn answer_unsuccessfully(&self) {
        self.inner.lock().unwrap().unsuccessful = true;
    }

    /// Records a call; returns the canned failure if one is set.
    fn record(&self, path: &'static str, body: Value) -> Option<Response> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(path).or_insert(0) += 1;
        inner.bodies.entry(path).or_default().push(body);

        inner.failure.clone().map(|(status, body)| {
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        })
    }
}

async fn chat(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = backend.record(CHAT, body.clone()) {
        return failure;
    }
    let success = !backend.inner.lock().unwrap().unsuccessful;

    Json(json!({
        "success": success,
        "response": format!("Answer to: {}", body["message"].as_str().unwrap_or_default()),
        "language": body["language"],
    }))
    .into_response()
}

async fn vision(State(backend): State<MockBackend>, mut multipart: Multipart) -> Response {
    let mut file_len = 0;
    let mut file_name = String::new();
    let mut language = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().unwrap_or_default().to_string();
                file_len = field.bytes().await.unwrap().len();
            }
            Some("language") => language = field.text().await.unwrap(),
            _ => {}
        }
    }

    let recorded = json!({"file_name": file_name, "file_len": file_len, "language": language});
    if let Some(failure) = backend.record(VISION, recorded) {
        return failure;
    }

    Json(json!({
        "success": true,
        "response": format!("An image of {} bytes", file_len),
        "language": language,
    }))
    .into_response()
}

async fn file(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = backend.record(FILE, body.clone()) {
        return failure;
    }

    Json(json!({
        "success": true,
        "response": "A document",
        "language": body["language"],
        "fileName": body["fileName"],
        "fileType": body["fileType"],
    }))
    .into_response()
}

async fn avatar(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = backend.record(AVATAR, body) {
        return failure;
    }

    Json(json!({
        "success": true,
        "video_url": "https://videos.example.com/1.mp4",
        "session_id": "session-1",
        "status": "completed",
    }))
    .into_response()
}

async fn screen(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = backend.record(SCREEN, body.clone()) {
        return failure;
    }

    Json(json!({
        "success": true,
        "response": "A code editor",
        "language": body["language"],
    }))
    .into_response()
}

async fn health(State(backend): State<MockBackend>) -> Response {
    if let Some(failure) = backend.record(HEALTH, Value::Null) {
        return failure;
    }
    Json(json!({"status": "ok"})).into_response()
}
