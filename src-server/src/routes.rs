//! Router configuration

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::commands;
use crate::state::AppState;

/// Largest accepted request body, sized for image uploads
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Analyses
        .route("/analyze_text", post(commands::analyze::analyze_text))
        .route("/analyze_image", post(commands::analyze::analyze_image))
        .route("/parse_demo", post(commands::analyze::parse_demo))
        // History
        .route(
            "/history",
            get(commands::history::get_history).delete(commands::history::clear_history),
        )
        .route("/health", get(commands::health::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the web UI: `index.html` at `/`, the whole directory under `/static`
pub fn with_frontend(router: Router, dir: &Path) -> Router {
    router
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .nest_service("/static", ServeDir::new(dir))
}
