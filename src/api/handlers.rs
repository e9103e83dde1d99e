//! API Handlers
//!
//! HTTP handlers for the gateway. Tutor endpoints forward to the shared
//! `ApiClient`; cache endpoints expose its administrative operations.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::warn;

use crate::cache::CacheStats;
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{RequestError, Result};
use crate::languages::{language_name, SUPPORTED_LANGUAGES};
use crate::models::{
    AvatarRequest, AvatarResponse, ChatRequest, ChatResponse, CleanupResponse, ClearResponse,
    FileAnalysisRequest, FileAnalysisResponse, GatewayHealthResponse, LanguagesResponse,
    ScreenFrameRequest, ScreenFrameResponse, Upload, VisionAnalyzeResponse,
};

/// JSON body whose rejection is turned into a `RequestError`.
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aware client for the tutor backend
    pub client: ApiClient,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }
}

/// Handler for POST /api/chat/respond
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: JsonBody<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(RequestError::InvalidInput(error_msg));
    }

    let response = state
        .client
        .chat(&req.message, language_name(&req.language), req.context.as_deref())
        .await?;
    Ok(Json(response))
}

/// Handler for POST /api/vision/analyze
///
/// Expects multipart fields `file` and, optionally, `language`.
pub async fn vision_handler(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<VisionAnalyzeResponse>> {
    let mut multipart = multipart?;
    let mut upload = None;
    let mut language = "English".to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::InvalidInput(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RequestError::InvalidInput(e.body_text()))?;
                upload = Some(Upload::new(file_name, mime_type, bytes.to_vec()));
            }
            Some("language") => {
                language = field
                    .text()
                    .await
                    .map_err(|e| RequestError::InvalidInput(e.body_text()))?;
            }
            other => {
                warn!(field = ?other, "ignoring unexpected multipart field");
            }
        }
    }

    let upload =
        upload.ok_or_else(|| RequestError::InvalidInput("Missing 'file' field".to_string()))?;

    let response = state
        .client
        .analyze_image(&upload, language_name(&language))
        .await?;
    Ok(Json(response))
}

/// Handler for POST /api/chat/respond/file
pub async fn file_handler(
    State(state): State<AppState>,
    payload: JsonBody<FileAnalysisRequest>,
) -> Result<Json<FileAnalysisResponse>> {
    let Json(req) = payload?;
    let bytes = BASE64
        .decode(req.file.trim())
        .map_err(|_| RequestError::InvalidInput("Invalid file data. Must be base64 encoded.".to_string()))?;
    let upload = Upload::new(req.file_name, req.file_type, bytes);

    let response = state
        .client
        .analyze_file(&upload, language_name(&req.language))
        .await?;
    Ok(Json(response))
}

/// Handler for POST /api/heygen/avatar
pub async fn avatar_handler(
    State(state): State<AppState>,
    payload: JsonBody<AvatarRequest>,
) -> Result<Json<AvatarResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(RequestError::InvalidInput(error_msg));
    }

    let response = state
        .client
        .generate_avatar(&req.text, language_name(&req.language))
        .await?;
    Ok(Json(response))
}

/// Handler for POST /api/screen/frame
pub async fn screen_frame_handler(
    State(state): State<AppState>,
    payload: JsonBody<ScreenFrameRequest>,
) -> Result<Json<ScreenFrameResponse>> {
    let Json(req) = payload?;
    if req.frame.trim().is_empty() {
        return Err(RequestError::InvalidInput("Frame cannot be empty".to_string()));
    }

    let response = state
        .client
        .analyze_screen_frame(&req.frame, language_name(&req.language))
        .await?;
    Ok(Json(response))
}

/// Handler for GET /api/health
///
/// Always answers 200; a backend failure shows up as `degraded`.
pub async fn health_handler(State(state): State<AppState>) -> Json<GatewayHealthResponse> {
    match state.client.health_check().await {
        Ok(health) => Json(GatewayHealthResponse::healthy(health.status)),
        Err(e) => Json(GatewayHealthResponse::degraded(e.to_string())),
    }
}

/// Handler for GET /api/languages
pub async fn languages_handler() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: SUPPORTED_LANGUAGES,
    })
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.client.cache_stats().await)
}

/// Handler for DELETE /api/cache
pub async fn cache_clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.client.clear_cache().await))
}

/// Handler for POST /api/cache/cleanup
pub async fn cache_cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    Json(CleanupResponse {
        removed: state.client.clear_expired_cache().await,
    })
}
