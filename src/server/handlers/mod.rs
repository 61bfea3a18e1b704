//! HTTP handlers for the server.

pub mod editor;
pub mod export;
pub mod import;
pub mod preview;
pub mod templates;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::LabsheetError;

/// Error notice returned as `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<LabsheetError> for ApiError {
    fn from(err: LabsheetError) -> Self {
        let status = match &err {
            LabsheetError::NotFound(_) => StatusCode::NOT_FOUND,
            LabsheetError::HandoffOccupied => StatusCode::CONFLICT,
            LabsheetError::Render(_) | LabsheetError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({"success": false, "error": self.message}))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
