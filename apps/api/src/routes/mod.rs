pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // CV analysis
        .route("/api/v1/cv/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/cv/analyze/batch",
            post(handlers::handle_analyze_batch),
        )
        .route(
            "/api/v1/cv/analyze/document",
            post(handlers::handle_analyze_document),
        )
        // Candidature analyses
        .route(
            "/api/v1/candidatures/analyses",
            get(handlers::handle_list_analyses),
        )
        .route(
            "/api/v1/candidatures/:id/analysis",
            get(handlers::handle_get_analysis).put(handlers::handle_store_analysis),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
