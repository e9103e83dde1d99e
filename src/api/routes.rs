//! API Routes
//!
//! Configures the Axum router for the gateway.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    avatar_handler, cache_cleanup_handler, cache_clear_handler, cache_stats_handler,
    chat_handler, file_handler, health_handler, languages_handler, screen_frame_handler,
    vision_handler, AppState,
};
use crate::models::MAX_FILE_SIZE;

/// Request bodies carry at most one file, base64-encoded in the JSON routes
const MAX_BODY_BYTES: usize = MAX_FILE_SIZE * 2;

/// Creates the gateway router with all endpoints configured.
///
/// # Endpoints
/// - `POST /api/vision/analyze` - Image analysis (cached)
/// - `POST /api/chat/respond` - Chat answer (cached)
/// - `POST /api/chat/respond/file` - Document analysis
/// - `POST /api/heygen/avatar` - Avatar video generation
/// - `POST /api/screen/frame` - Screen frame analysis
/// - `GET /api/health` - Gateway and backend health
/// - `GET /api/languages` - Supported languages
/// - `GET /api/cache/stats` - Cache contents and counters
/// - `DELETE /api/cache` - Drop every cached response
/// - `POST /api/cache/cleanup` - Drop expired responses
///
/// # Middleware
/// - CORS: Allows any origin, since the tutor UI is served elsewhere
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/vision/analyze", post(vision_handler))
        .route("/api/chat/respond", post(chat_handler))
        .route("/api/chat/respond/file", post(file_handler))
        .route("/api/heygen/avatar", post(avatar_handler))
        .route("/api/screen/frame", post(screen_frame_handler))
        .route("/api/health", get(health_handler))
        .route("/api/languages", get(languages_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/api/cache", delete(cache_clear_handler))
        .route("/api/cache/cleanup", post(cache_cleanup_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
