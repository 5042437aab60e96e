//! redline-server library - HTTP surface for the design-review backend
//!
//! Exposes the wireframe catalog, positioned review comments, and file
//! uploads over an axum router. Catalog rows are written only by the
//! startup sync pipeline in `redline-common`; the API reads the catalog and
//! owns the review data attached to it.

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Directory holding uploaded file bytes
    pub uploads_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, uploads_dir: PathBuf) -> Self {
        Self { db, uploads_dir }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, patch};

    let api = Router::new()
        .route("/api/wireframes", get(api::wireframes::list_wireframes))
        .route("/api/wireframes/:id", get(api::wireframes::get_wireframe))
        .route(
            "/api/wireframes/:id/comments",
            get(api::comments::list_comments).post(api::comments::create_comment),
        )
        .route(
            "/api/comments/:id",
            patch(api::comments::update_comment).delete(api::comments::delete_comment),
        )
        .route(
            "/api/wireframes/:id/uploads",
            get(api::uploads::list_uploads).post(api::uploads::create_upload),
        )
        .route("/api/uploads/:id", delete(api::uploads::delete_upload));

    // Uploaded bytes are served statically, like the rest of the review UI
    // expects; metadata lives under /api
    let static_uploads = ServeDir::new(&state.uploads_dir);

    Router::new()
        .merge(api)
        .merge(api::health::health_routes())
        .nest_service("/uploads", static_uploads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
