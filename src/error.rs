/*!
 * API Errors
 * Mapping of validation, storage and lookup failures to HTTP responses
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::db::repository::RepositoryError;
use crate::routes::ErrorResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("request body too large")]
    BodyTooLarge,
    #[error("sections must be a non-empty array")]
    SectionsRequired,
    #[error("invalid page id")]
    InvalidId,
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] RepositoryError),
    #[error("failed to serialize page: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::SectionsRequired | ApiError::InvalidId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) | ApiError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable reason sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody(_) => "invalid_body",
            ApiError::BodyTooLarge => "body_too_large",
            ApiError::SectionsRequired => "sections_required",
            ApiError::InvalidId => "invalid_id",
            ApiError::NotFound => "not_found",
            ApiError::Storage(_) => "storage_error",
            ApiError::Serialization(_) => "serialization_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) => "Database error".to_string(),
            ApiError::Serialization(_) => "Server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.code().to_string(),
                message: Some(self.public_message()),
            }),
        )
            .into_response()
    }
}
