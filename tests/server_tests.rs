//! # Server Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use labsheet::render::raster::Canvas;
use labsheet::server::{AppState, ServerConfig, router};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "labsheet-test-boundary";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn app() -> Router {
    router(Arc::new(AppState::new(ServerConfig::default())))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

fn multipart(file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    Request::post("/api/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

// ============================================================================
// LIBRARY
// ============================================================================

#[tokio::test]
async fn test_list_builtins() {
    let app = app();
    let response = send(&app, get("/api/templates")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = json(response).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        [
            "Standard Blood Test Report",
            "Comprehensive Health Panel",
            "Microbiology Report",
            "Histopathology Report",
        ]
    );
    assert_eq!(list[0]["elementCount"], 2);
}

#[tokio::test]
async fn test_unknown_template_is_404_notice() {
    let app = app();
    let response = send(&app, get("/api/templates/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_create_duplicate_delete() {
    let app = app();

    let response = send(&app, post("/api/templates", r#"{"name":"Lipid Panel"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json(response).await;
    assert_eq!(created["name"], "Lipid Panel");
    assert_eq!(created["elements"], serde_json::json!([]));

    let response = send(&app, post("/api/templates/1/duplicate", Body::empty())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy = json(response).await;
    assert_eq!(copy["name"], "Standard Blood Test Report (Copy)");
    assert_eq!(copy["isDefault"], false);

    let response = send(&app, Request::delete("/api/templates/3").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, get("/api/templates/3")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = json(send(&app, get("/api/templates")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_update_rejects_malformed() {
    let app = app();
    let body = r#"{"id":"2","name":"Panel","elements":[{"id":"a","type":"bogus","position":{"x":0,"y":0,"width":50,"height":10}}]}"#;
    let request = Request::put("/api/templates/2")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json(response).await["error"].as_str().unwrap().contains("elements[0]"));

    let stored = json(send(&app, get("/api/templates/2")).await).await;
    assert_eq!(stored["name"], "Comprehensive Health Panel");
}

// ============================================================================
// PREVIEW AND EXPORT
// ============================================================================

#[tokio::test]
async fn test_preview_page() {
    let app = app();
    let response = send(&app, get("/api/templates/1/preview")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = text(response).await;
    assert!(html.contains("BLOOD TEST REPORT"));
    assert!(html.contains("[Patient Name]"));
}

#[tokio::test]
async fn test_preview_png() {
    let app = app();
    let response = send(&app, get("/api/templates/1/preview/png?mode=edit&width=425")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = body_bytes(response).await;
    assert_eq!(&bytes[1..4], b"PNG");
}

#[tokio::test]
async fn test_raw_preview_marks_unknown_kinds() {
    let app = app();
    let body = r#"{"name":"Newer","elements":[{"id":"q","type":"qr-code","position":{"x":0,"y":0,"width":20,"height":10}}]}"#;
    let response = send(&app, post("/api/preview", body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("Unrecognized element: qr-code"));
}

#[tokio::test]
async fn test_export_json_download() {
    let app = app();
    let response = send(&app, get("/api/templates/1/export/json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"standard_blood_test_report.json\""
    );
    let doc = labsheet::export::deserialize(&body_bytes(response).await).unwrap();
    assert_eq!(doc.id, "1");
    assert_eq!(doc.elements.len(), 2);
}

#[tokio::test]
async fn test_export_unknown_format() {
    let app = app();
    let response = send(&app, get("/api/templates/1/export/docx")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_share_link() {
    let app = app();
    let body = json(send(&app, get("/api/templates/4/share")).await).await;
    assert_eq!(body["link"], "http://localhost:8080/templates/shared/4");

    let response = send(&app, get("/api/templates/4/share/qr")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
}

// ============================================================================
// HAND-OFF
// ============================================================================

#[tokio::test]
async fn test_handoff_read_once() {
    let app = app();
    let response = send(&app, post("/api/templates/1/edit", Body::empty())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["redirect"], "/report-builder?mode=edit&templateId=1");

    let doc = json(send(&app, get("/api/editor/handoff")).await).await;
    assert_eq!(doc["id"], "1");

    let response = send(&app, get("/api/editor/handoff")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stale_handoff_replaced() {
    let app = app();
    send(&app, post("/api/templates/1/edit", Body::empty())).await;
    send(&app, post("/api/templates/2/edit", Body::empty())).await;
    let doc = json(send(&app, get("/api/editor/handoff")).await).await;
    assert_eq!(doc["id"], "2");
}

#[tokio::test]
async fn test_editor_opens_new_blank() {
    let app = app();
    send(&app, post("/api/editor/new", Body::empty())).await;
    let canvas = json(send(&app, get("/api/editor/open")).await).await;
    assert_eq!(canvas["name"], "New Template");
    assert_eq!(canvas["elements"], serde_json::json!([]));

    // Slot is empty now: the editor falls back to the default report.
    let canvas = json(send(&app, get("/api/editor/open")).await).await;
    assert_eq!(canvas["name"], "Default Lab Report");
}

// ============================================================================
// IMPORT
// ============================================================================

#[tokio::test]
async fn test_import_scan() {
    let app = app();
    let png = Canvas::new(40, 52).to_png().unwrap();
    let response = send(&app, multipart("scan.png", "image/png", &png)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json(response).await;
    assert_eq!(body["template"]["source"], "imported");
    assert_eq!(body["template"]["category"], "Imported");
    assert_eq!(body["template"]["metadata"]["originalFile"], "scan.png");
    assert_eq!(body["analysis"]["pageSize"], serde_json::json!({"width": 40, "height": 52}));
    assert_eq!(body["analysis"]["regions"].as_array().unwrap().len(), 9);

    let list = json(send(&app, get("/api/templates")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_import_rejects_unsupported_type() {
    let app = app();
    let response = send(&app, multipart("scan.gif", "image/gif", b"GIF89a")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json(response).await["error"],
        "Please upload a PDF or image file (JPG, PNG)"
    );
}

#[tokio::test]
async fn test_import_refuses_pdf_analysis() {
    let app = app();
    let response = send(&app, multipart("scan.pdf", "application/pdf", b"%PDF-1.4")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json(response).await["error"].as_str().unwrap().contains("PDF analysis"));
}
