//! Editor hand-off handlers.
//!
//! The template list writes a document into the hand-off slot, then the
//! editor reads it exactly once.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use std::sync::Arc;

use crate::editor::{CanvasView, Editor};
use crate::error::LabsheetError;
use crate::template::TemplateDocument;

use super::super::state::AppState;
use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct HandoffResponse {
    pub success: bool,
    pub id: String,
    pub redirect: String,
}

/// Put `document` in the slot, replacing an unread one.
fn hand_off(state: &AppState, document: TemplateDocument, mode: &str) -> ApiResult<Json<HandoffResponse>> {
    let id = document.id.clone();
    if let Some(stale) = state.handoff.replace(document) {
        tracing::warn!(id = %stale.id, "discarded unread hand-off");
    }
    tracing::info!(id = %id, mode, "template handed off to editor");
    Ok(Json(HandoffResponse {
        success: true,
        redirect: format!("/report-builder?mode={}&templateId={}", mode, id),
        id,
    }))
}

/// POST /api/templates/:id/edit - Open a stored template in the editor.
pub async fn edit(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<HandoffResponse>> {
    let document = state.library.read().await.get(&id)?.document.clone();
    hand_off(&state, document, "edit")
}

/// POST /api/editor/new - Open a blank template in the editor.
pub async fn new(State(state): State<Arc<AppState>>) -> ApiResult<Json<HandoffResponse>> {
    hand_off(&state, TemplateDocument::blank("New Template"), "create")
}

/// GET /api/editor/handoff - Take the waiting document.
pub async fn take(State(state): State<Arc<AppState>>) -> ApiResult<Json<TemplateDocument>> {
    state
        .handoff
        .take()
        .map(Json)
        .ok_or_else(|| LabsheetError::NotFound("no template waiting for the editor".into()).into())
}

/// GET /api/editor/open - Editor canvas for the waiting document, or for the
/// default report when nothing is waiting.
pub async fn open(State(state): State<Arc<AppState>>) -> Json<CanvasView> {
    Json(Editor::from_handoff(&state.handoff).canvas())
}
