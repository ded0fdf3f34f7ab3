//! Route definitions

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, state::AppState};

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": true,
            "message": "Not found. Visit / for the prediction form or /api/health to check status.",
        })),
    )
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::serve_index))
        .route("/predict", post(handlers::predict))
        .route("/api/health", get(handlers::health_check))
        .fallback(handle_404)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
