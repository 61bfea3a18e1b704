//! # HTTP Server for the Template Library
//!
//! Serves the template library, previews, exports, scan import and the editor
//! hand-off over a JSON API.
//!
//! ## Usage
//!
//! ```bash
//! labsheet serve --listen 0.0.0.0:8080 --public-url https://lab.example.com
//! ```
//!
//! ## Routes
//!
//! | Method | Path | |
//! |--------|------|-|
//! | GET, POST | `/api/templates` | list, create blank |
//! | GET, PUT, DELETE | `/api/templates/:id` | read, replace, delete |
//! | POST | `/api/templates/:id/duplicate` | copy under a new id |
//! | GET | `/api/templates/:id/preview[/png]` | HTML or PNG preview |
//! | GET | `/api/templates/:id/export/:format` | pdf, json, image, html |
//! | GET | `/api/templates/:id/share[/qr]` | share link, QR code |
//! | POST | `/api/templates/:id/edit`, `/api/editor/new` | hand-off to the editor |
//! | GET | `/api/editor/handoff`, `/api/editor/open` | read the hand-off |
//! | POST | `/api/import` | multipart scan upload |
//! | POST | `/api/preview` | lenient preview of raw JSON |

mod handlers;
mod state;

pub use handlers::ApiError;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::LabsheetError;
use crate::upload::MAX_UPLOAD_BYTES;

/// Slack for multipart framing on top of the upload ceiling.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Library
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::create),
        )
        .route(
            "/api/templates/:id",
            get(handlers::templates::get)
                .put(handlers::templates::update)
                .delete(handlers::templates::delete),
        )
        .route(
            "/api/templates/:id/duplicate",
            post(handlers::templates::duplicate),
        )
        // Preview
        .route("/api/templates/:id/preview", get(handlers::preview::page))
        .route("/api/templates/:id/preview/png", get(handlers::preview::png))
        .route("/api/preview", post(handlers::preview::raw))
        // Export and share
        .route(
            "/api/templates/:id/export/:format",
            get(handlers::export::download),
        )
        .route("/api/templates/:id/share", get(handlers::export::share))
        .route("/api/templates/:id/share/qr", get(handlers::export::share_qr))
        // Editor hand-off
        .route("/api/templates/:id/edit", post(handlers::editor::edit))
        .route("/api/editor/new", post(handlers::editor::new))
        .route("/api/editor/handoff", get(handlers::editor::take))
        .route("/api/editor/open", get(handlers::editor::open))
        // Import (10MB uploads)
        .route(
            "/api/import",
            post(handlers::import::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labsheet::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), labsheet::error::LabsheetError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     public_url: "http://localhost:8080".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LabsheetError> {
    let state = Arc::new(AppState::new(config.clone()));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(
        listen = %config.listen_addr,
        public_url = %config.public_url,
        "labsheet server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
