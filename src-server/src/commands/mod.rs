//! HTTP handlers

pub mod analyze;
pub mod health;
pub mod history;

use axum::http::StatusCode;

use crate::pipeline::PipelineError;

/// Validation failures are client errors; every other failure is reported
/// inside a successful response
pub(crate) fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Extraction(_) | PipelineError::Analysis(_) => StatusCode::OK,
    }
}
