//! Liveness probe

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let client = state.pipeline.client();

    Json(json!({
        "status": "healthy",
        "service": "Competitor Monitor",
        "version": env!("CARGO_PKG_VERSION"),
        "text_provider": client.text_provider().map(|(name, _)| name),
        "vision_provider": client.vision_provider().map(|(name, _)| name),
        "extraction_mode": state.pipeline.extractor().mode(),
    }))
}
