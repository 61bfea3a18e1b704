//! Preview handlers: HTML pages and PNG rasters of templates.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::LabsheetError;
use crate::render::{RenderMode, html, raster, render_document_value};

use super::super::state::AppState;
use super::ApiResult;

/// Query parameters for preview endpoints.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default = "default_mode")]
    pub mode: RenderMode,
    #[serde(default = "default_width")]
    pub width: usize,
}

fn default_mode() -> RenderMode {
    RenderMode::Preview
}

fn default_width() -> usize {
    850
}

/// GET /api/templates/:id/preview - Render a stored template as HTML.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Html<String>> {
    let library = state.library.read().await;
    let record = library.get(&id)?;
    Ok(Html(html::render_page(&record.document, query.mode)))
}

/// GET /api/templates/:id/preview/png - Render a stored template as PNG.
pub async fn png(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<impl IntoResponse> {
    let document = state.library.read().await.get(&id)?.document.clone();
    let png_bytes = raster::render_png(&document, query.mode, query.width)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}

/// POST /api/preview - Render a raw interchange document as HTML.
///
/// Lenient: elements of unknown kinds show up as markers instead of failing
/// the whole document.
pub async fn raw(Query(query): Query<PreviewQuery>, body: Bytes) -> ApiResult<Html<String>> {
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| LabsheetError::MalformedTemplate(e.to_string()))?;
    let views = render_document_value(&value, query.mode)?;
    let title = value.get("name").and_then(|n| n.as_str()).unwrap_or("Preview");
    Ok(Html(html::render_views(title, &views)))
}
