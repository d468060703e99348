pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::documents::handlers as documents;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/re-analyze", post(analysis::handle_reanalyze))
        .route(
            "/api/v1/regenerate-suggestions",
            post(analysis::handle_regenerate_suggestions),
        )
        .route(
            "/api/v1/apply-suggestion",
            post(analysis::handle_apply_suggestion),
        )
        // Export API
        .route("/api/v1/download/:format", post(documents::handle_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
