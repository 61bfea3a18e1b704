//! Export and share handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use crate::export::{self, ExportFormat, ExportOptions};

use super::super::state::AppState;
use super::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub link: String,
}

/// GET /api/templates/:id/export/:format - Download an export artifact.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((id, format)): Path<(String, String)>,
    Query(options): Query<ExportOptions>,
) -> ApiResult<impl IntoResponse> {
    let format: ExportFormat = format.parse().map_err(ApiError::bad_request)?;
    let document = state.library.read().await.get(&id)?.document.clone();
    let artifact = export::export(&document, format, &options)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        artifact.file_name.replace('"', "")
    );
    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    ))
}

/// GET /api/templates/:id/share - Shareable link for a template.
pub async fn share(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<ShareResponse>> {
    state.library.read().await.get(&id)?;
    Ok(Json(ShareResponse {
        link: export::share_link(&state.config.public_url, &id),
    }))
}

/// GET /api/templates/:id/share/qr - QR code of the share link.
pub async fn share_qr(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<impl IntoResponse> {
    state.library.read().await.get(&id)?;
    let link = export::share_link(&state.config.public_url, &id);
    let png_bytes = export::share_qr_png(&link)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}
