//! History listing and clearing

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rivalwatch_core::HistoryEntry;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub items: Vec<HistoryEntry>,
    pub total: usize,
}

pub async fn get_history(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.history().await {
        Ok(items) => {
            let total = items.len();
            Json(HistoryResponse { items, total }).into_response()
        }
        Err(e) => {
            error!("Failed to read history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn clear_history(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.clear_history().await {
        Ok(()) => Json(json!({ "success": true, "message": "History cleared" })).into_response(),
        Err(e) => {
            error!("Failed to clear history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
