//! Analysis endpoints

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use rivalwatch_core::{CompetitorAnalysis, ImageAnalysis};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::status_for;
use crate::pipeline::{validate_image_type, ParsedPageReport, PipelineError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseDemoRequest {
    pub url: String,
}

/// Envelope for text and image analyses
#[derive(Debug, Serialize)]
pub struct AnalysisResponse<T> {
    pub success: bool,
    pub analysis: Option<T>,
    pub error: Option<String>,
}

/// Envelope for page parses
#[derive(Debug, Serialize)]
pub struct ParseDemoResponse {
    pub success: bool,
    pub data: Option<ParsedPageReport>,
    pub error: Option<String>,
}

impl<T: Serialize> AnalysisResponse<T> {
    fn from_result(result: Result<T, PipelineError>) -> Response {
        match result {
            Ok(analysis) => Json(Self {
                success: true,
                analysis: Some(analysis),
                error: None,
            })
            .into_response(),
            Err(e) => {
                warn!("Analysis failed: {}", e);
                let status = status_for(&e);
                (
                    status,
                    Json(Self {
                        success: false,
                        analysis: None,
                        error: Some(e.to_string()),
                    }),
                )
                    .into_response()
            }
        }
    }
}

pub async fn analyze_text(
    State(state): State<AppState>,
    Json(request): Json<TextAnalysisRequest>,
) -> Response {
    let result = state.pipeline.analyze_text(&request.text).await;
    AnalysisResponse::<CompetitorAnalysis>::from_result(result)
}

pub async fn analyze_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let result = match read_upload(&mut multipart).await {
        Ok(upload) => {
            state
                .pipeline
                .analyze_image(&upload.filename, &upload.content_type, &upload.bytes)
                .await
        }
        Err(e) => Err(e),
    };
    AnalysisResponse::<ImageAnalysis>::from_result(result)
}

pub async fn parse_demo(
    State(state): State<AppState>,
    Json(request): Json<ParseDemoRequest>,
) -> Response {
    match state.pipeline.parse_page(&request.url).await {
        Ok(report) => Json(ParseDemoResponse {
            success: true,
            data: Some(report),
            error: None,
        })
        .into_response(),
        Err(e) => {
            warn!("Parse of {} failed: {}", request.url, e);
            (
                status_for(&e),
                Json(ParseDemoResponse {
                    success: false,
                    data: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}

struct Upload {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// Pull the `file` part; its type is checked before the body is read
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, PipelineError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::Validation(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        validate_image_type(&content_type)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| PipelineError::Validation(format!("Invalid upload: {}", e)))?;

        return Ok(Upload { filename, content_type, bytes });
    }

    Err(PipelineError::Validation("Missing file field".to_string()))
}
