//! Request and response models for the tutor backend API
//!
//! Wire DTOs shared by the API client and the gateway, plus the in-memory
//! upload type.

pub mod requests;
pub mod responses;
pub mod upload;

// Re-export commonly used types
pub use requests::{AvatarRequest, ChatRequest, FileAnalysisRequest, ScreenFrameRequest};
pub use responses::{
    AnalysisResponse, AvatarResponse, ChatResponse, CleanupResponse, ClearResponse,
    FileAnalysisResponse, GatewayHealthResponse, HealthResponse, LanguagesResponse,
    ScreenFrameResponse, VisionAnalyzeResponse,
};
pub use upload::{Upload, MAX_FILE_SIZE};
