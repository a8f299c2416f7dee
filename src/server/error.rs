use crate::error::StudioError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error as ThisError;

/// Errors returned by the HTTP handlers before any model call is made.
#[derive(ThisError, Debug)]
pub enum ApiError {
    /// No API key was configured at startup
    #[error("{message}")]
    NotConfigured { message: String },

    /// Missing file, empty prompt or unreadable form
    #[error("{message}")]
    BadRequest { message: String },

    /// File type outside the accepted list
    #[error("{message}")]
    UnsupportedMediaType { message: String },

    /// Upload larger than the configured body limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Page rendering or another server-side fault
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StudioError> for ApiError {
    fn from(error: StudioError) -> Self {
        match error {
            StudioError::MissingInput(message) => ApiError::BadRequest { message },
            StudioError::ConfigError(message) => ApiError::NotConfigured { message },
            other => ApiError::BadRequest {
                message: other.to_string(),
            },
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(error: askama::Error) -> Self {
        ApiError::Internal {
            message: format!("Failed to render page: {}", error),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge {
                message: format!("Upload exceeds the size limit: {}", error.body_text()),
            }
        } else {
            ApiError::BadRequest {
                message: format!("Failed to parse multipart data: {}", error.body_text()),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::NotConfigured { .. } => tracing::warn!("Request blocked: {}", self),
            ApiError::Internal { .. } => tracing::error!("Internal error: {}", self),
            ApiError::BadRequest { .. }
            | ApiError::UnsupportedMediaType { .. }
            | ApiError::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self)
            }
        }

        let body = serde_json::json!({ "message": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
