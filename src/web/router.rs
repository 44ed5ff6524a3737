//! Router configuration for the web front-end.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{upload, upload_form, AppState};

/// Room in the request body limit beyond the file size cap.
///
/// Covers multipart boundaries, part headers and other form fields. The file
/// part itself is held to the policy's cap while it is read.
pub const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Create the main router: the form, the upload endpoint and stored files.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let body_limit = (app_state.policy.max_size() + MULTIPART_OVERHEAD) as usize;
    let uploads = ServeDir::new(app_state.blobs.dir());
    let uploads_prefix = app_state.blobs.public_prefix().to_string();

    Router::new()
        .route("/", get(upload_form))
        .route("/upload", post(upload))
        .nest_service(&uploads_prefix, uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Attach a static asset directory as the fallback for unmatched paths.
///
/// Returns the router unchanged when the directory doesn't exist.
pub fn with_static_fallback(router: Router, static_path: &str) -> Router {
    if Path::new(static_path).is_dir() {
        tracing::info!("Serving static files from {}", static_path);
        router.fallback_service(ServeDir::new(static_path))
    } else {
        tracing::warn!("Static files directory not found: {}", static_path);
        router
    }
}
