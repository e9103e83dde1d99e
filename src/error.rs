//! Error types for the tutor API client and gateway
//!
//! Every failure of an upstream call surfaces as a `RequestError`. The cache
//! itself has no error type: a miss is reported in-band as `None`.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Request Error Enum ==
/// Failure of a call to the tutor backend.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Transport failure: the request never got a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend answered 2xx with a body we could not parse
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Rejected locally before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RequestError {
    /// Builds an `Api` error from a failed response body.
    ///
    /// Uses the body's `detail` string when there is one, otherwise a
    /// generic `API Error: <status>` message.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|d| !d.is_empty());

        RequestError::Api {
            status,
            message: detail.unwrap_or_else(|| format!("API Error: {}", status)),
        }
    }

    /// HTTP status reported by the backend, if the call got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Api { status, .. } => Some(*status),
            RequestError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// == Extractor Rejections ==
// Malformed gateway requests answer with the same `detail` body as every
// other error.
impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        RequestError::InvalidInput(rejection.body_text())
    }
}

impl From<MultipartRejection> for RequestError {
    fn from(rejection: MultipartRejection) -> Self {
        RequestError::InvalidInput(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match &self {
            RequestError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RequestError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RequestError::Network(_) | RequestError::Decode(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for API client calls.
pub type Result<T> = std::result::Result<T, RequestError>;
