//! Scan import handler.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use crate::analysis::{self, AnalysisResult};
use crate::library::{TemplateRecord, today};
use crate::upload::Upload;

use super::super::state::AppState;
use super::{ApiError, ApiResult};

/// Response from the import endpoint.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub template: TemplateRecord,
    pub analysis: AnalysisResult,
}

/// POST /api/import - Upload a scan and add the generated template.
///
/// Expects a multipart form with a `file` field.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ImportResponse>)> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
        upload = Some(Upload::accept(file_name, content_type.as_deref(), bytes.to_vec())?);
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file field found"))?;
    let analyzer = Arc::clone(&state.analyzer);
    let (document, analysis) = analysis::import(analyzer.as_ref(), &upload)?;

    let mut library = state.library.write().await;
    let template = library.import(document, today())?.clone();
    Ok((StatusCode::CREATED, Json(ImportResponse { template, analysis })))
}
