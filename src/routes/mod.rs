//! HTTP routes
//!
//! - `POST /upload-file` - multipart file ingress
//! - `GET /health` - liveness check

pub mod files;
pub mod health;

use crate::models::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    info!(upload_dir = %state.server.upload_dir.display(), "Creating application router");

    let max_upload_bytes = state.server.max_upload_bytes;

    Router::new()
        .merge(files::router(state))
        .merge(health::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
