//! Request DTOs for the tutor backend API
//!
//! The same shapes are sent upstream by the client and accepted by the
//! gateway, so they derive both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};

/// Longest chat message the backend accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Longest avatar script the backend accepts, in characters
pub const MAX_AVATAR_TEXT_CHARS: usize = 5_000;

fn default_language() -> String {
    "English".to_string()
}

/// Body of `POST /api/chat/respond`
///
/// Also the argument object fingerprinted for chat cache keys, so an
/// absent `context` is skipped rather than serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user message
    pub message: String,
    /// Response language
    #[serde(default = "default_language")]
    pub language: String,
    /// Previous conversation context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ChatRequest {
    pub fn new(
        message: impl Into<String>,
        language: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            language: language.into(),
            context,
        }
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.message.trim().is_empty() {
            return Some("Message cannot be empty".to_string());
        }
        if self.message.chars().count() > MAX_MESSAGE_CHARS {
            return Some(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_CHARS
            ));
        }
        None
    }
}

/// Body of `POST /api/heygen/avatar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarRequest {
    /// Text for the avatar to speak
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl AvatarRequest {
    pub fn validate(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            return Some("Text cannot be empty".to_string());
        }
        if self.text.chars().count() > MAX_AVATAR_TEXT_CHARS {
            return Some(format!(
                "Text exceeds maximum length of {} characters",
                MAX_AVATAR_TEXT_CHARS
            ));
        }
        None
    }
}

/// Body of `POST /api/screen/frame`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenFrameRequest {
    /// Base64 image data without a data-URL prefix
    pub frame: String,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Body of `POST /api/chat/respond/file`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisRequest {
    /// Base64 file content
    pub file: String,
    pub file_name: String,
    /// MIME type
    pub file_type: String,
    #[serde(default = "default_language")]
    pub language: String,
}
