//! Template library API handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::export;
use crate::library::{TemplateRecord, TemplateSummary, today};

use super::super::state::AppState;
use super::{ApiError, ApiResult};

/// Request body for creating a blank template.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/templates - List templates.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<TemplateSummary>> {
    Json(state.library.read().await.summaries())
}

/// GET /api/templates/:id - One template with its elements.
pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<TemplateRecord>> {
    let library = state.library.read().await;
    Ok(Json(library.get(&id)?.clone()))
}

/// POST /api/templates - Create a blank template.
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<TemplateRecord>)> {
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "New Template".to_string());
    let mut library = state.library.write().await;
    let record = library.create_blank(name, req.category.as_deref(), today())?.clone();
    tracing::info!(id = %record.id(), name = %record.document.name, "template created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/templates/:id - Replace a template's document.
///
/// The body is the interchange format; its id must match the path.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<TemplateRecord>> {
    let document = export::deserialize(&body)?;
    if document.id != id {
        return Err(ApiError::bad_request(format!(
            "Template id '{}' does not match '{}'",
            document.id, id
        )));
    }
    let mut library = state.library.write().await;
    let record = library.update_document(document, today())?.clone();
    Ok(Json(record))
}

/// DELETE /api/templates/:id
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let removed = state.library.write().await.delete(&id)?;
    tracing::info!(id = %id, name = %removed.document.name, "template deleted");
    Ok(Json(json!({"success": true})))
}

/// POST /api/templates/:id/duplicate
pub async fn duplicate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<(StatusCode, Json<TemplateRecord>)> {
    let mut library = state.library.write().await;
    let record = library.duplicate(&id, today())?.clone();
    tracing::info!(source = %id, id = %record.id(), "template duplicated");
    Ok((StatusCode::CREATED, Json(record)))
}
