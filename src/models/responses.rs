//! Response DTOs for the tutor backend API and the gateway's own endpoints

use serde::{Deserialize, Serialize};

use crate::languages::Language;

/// Text answer produced by the backend's vision, chat and screen endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    /// The generated answer
    pub response: String,
    /// Language the answer is written in
    pub language: String,
}

/// Response of `POST /api/chat/respond`
pub type ChatResponse = AnalysisResponse;

/// Response of `POST /api/vision/analyze`
pub type VisionAnalyzeResponse = AnalysisResponse;

/// Response of `POST /api/screen/frame`
pub type ScreenFrameResponse = AnalysisResponse;

/// Response of `POST /api/chat/respond/file`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisResponse {
    pub success: bool,
    pub response: String,
    pub language: String,
    pub file_name: String,
    pub file_type: String,
}

/// Response of `POST /api/heygen/avatar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Generation status reported by the avatar service
    pub status: String,
}

/// Response of the backend's `GET /api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Response of the gateway's `GET /api/health`
#[derive(Debug, Clone, Serialize)]
pub struct GatewayHealthResponse {
    /// "healthy" when the backend answered, "degraded" otherwise
    pub status: String,
    /// Backend status, or the error reaching it
    pub upstream: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl GatewayHealthResponse {
    pub fn healthy(upstream: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            upstream: upstream.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            status: "degraded".to_string(),
            upstream: reason.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response of `POST /api/cache/cleanup`
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response of `DELETE /api/cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries dropped
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached responses", cleared),
            cleared,
        }
    }
}

/// Response of `GET /api/languages`
#[derive(Debug, Clone, Serialize)]
pub struct LanguagesResponse {
    pub languages: &'static [Language],
}
