use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors produced while collecting input, calling Gemini, or serving the UI
#[derive(Error, Debug)]
pub enum PagesmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Unsupported file type '{mime}': only images and PDF documents can be attached")]
    UnsupportedMedia { mime: String },

    #[error("Attachment is {size} bytes, limit is {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Prompt was blocked by the model: {0}")]
    Blocked(String),

    #[error("Gemini API returned no text")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, PagesmithError>;

impl PagesmithError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedMedia { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } | Self::BodyTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Self::Http(_) | Self::Upstream { .. } | Self::Blocked(_) | Self::EmptyResponse => {
                StatusCode::BAD_GATEWAY
            }
            Self::Config(_) | Self::Json(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PagesmithError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
