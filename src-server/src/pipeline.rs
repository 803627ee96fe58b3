//! Analysis pipeline: validate, extract, analyze, record

use rivalwatch_core::{
    truncate_chars, AnalysisKind, CompetitorAnalysis, HistoryEntry, ImageAnalysis,
};
use rivalwatch_extract::{ContentExtractor, ExtractError};
use rivalwatch_history::{error::HistoryError, HistoryLog};
use rivalwatch_llm::{AnalysisClient, LlmError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

/// Shortest text accepted for analysis, in characters
pub const MIN_TEXT_CHARS: usize = 10;

/// Image MIME types accepted for analysis
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const TEXT_PREVIEW_CHARS: usize = 100;
const IMAGE_SUMMARY_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Request rejected before any work was done
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Analysis(#[from] LlmError),
}

/// Extracted page fields together with their analysis
#[derive(Debug, Clone, Serialize)]
pub struct ParsedPageReport {
    /// URL as requested
    pub url: String,
    pub title: Option<String>,
    pub h1: Option<String>,
    pub first_paragraph: Option<String>,
    pub analysis: CompetitorAnalysis,
}

pub struct Pipeline {
    client: AnalysisClient,
    extractor: ContentExtractor,
    history: HistoryLog,
}

impl Pipeline {
    pub fn new(client: AnalysisClient, extractor: ContentExtractor, history: HistoryLog) -> Self {
        Self { client, extractor, history }
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    pub fn extractor(&self) -> &ContentExtractor {
        &self.extractor
    }

    /// Analyze competitor text and record it
    pub async fn analyze_text(&self, text: &str) -> Result<CompetitorAnalysis, PipelineError> {
        if text.chars().count() < MIN_TEXT_CHARS {
            return Err(PipelineError::Validation(format!(
                "Text must be at least {} characters",
                MIN_TEXT_CHARS
            )));
        }

        let analysis = self.client.analyze_text(text).await?;

        let mut preview = truncate_chars(text, TEXT_PREVIEW_CHARS);
        if text.chars().count() > TEXT_PREVIEW_CHARS {
            preview.push_str("...");
        }

        self.record(
            AnalysisKind::Text,
            &preview,
            &analysis.summary,
            json!({ "analysis": analysis }),
        )
        .await;

        Ok(analysis)
    }

    /// Analyze an uploaded image and record it
    pub async fn analyze_image(
        &self,
        filename: &str,
        mime_type: &str,
        image: &[u8],
    ) -> Result<ImageAnalysis, PipelineError> {
        validate_image_type(mime_type)?;
        if image.is_empty() {
            return Err(PipelineError::Validation("Uploaded file is empty".to_string()));
        }

        info!("Analyzing image {} ({}, {} bytes)", filename, mime_type, image.len());
        let analysis = self.client.analyze_image(image, mime_type).await?;

        let description = if analysis.description.is_empty() {
            "Image analysis"
        } else {
            analysis.description.as_str()
        };

        self.record(
            AnalysisKind::Image,
            &format!("Image: {}", filename),
            &truncate_chars(description, IMAGE_SUMMARY_CHARS),
            json!({ "analysis": analysis }),
        )
        .await;

        Ok(analysis)
    }

    /// Extract a competitor page, analyze it and record it
    pub async fn parse_page(&self, url: &str) -> Result<ParsedPageReport, PipelineError> {
        if url.trim().is_empty() {
            return Err(PipelineError::Validation("URL must not be empty".to_string()));
        }

        let page = self.extractor.extract(url).await?;
        let analysis = self.client.analyze_page(&page).await?;

        let report = ParsedPageReport {
            url: url.to_string(),
            title: page.title,
            h1: page.heading,
            first_paragraph: page.excerpt,
            analysis,
        };

        let details = serde_json::to_value(&report).unwrap_or(Value::Null);
        self.record(
            AnalysisKind::ParsedPage,
            &format!("URL: {}", url),
            report.title.as_deref().unwrap_or("N/A"),
            details,
        )
        .await;

        Ok(report)
    }

    /// Retained history, newest first
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.history.list().await
    }

    pub async fn clear_history(&self) -> Result<(), HistoryError> {
        self.history.clear().await
    }

    /// A failed write loses the entry but never the analysis
    async fn record(&self, kind: AnalysisKind, request: &str, response: &str, details: Value) {
        if let Err(e) = self.history.append(kind, request, response, Some(details)).await {
            warn!("Failed to record {} analysis in history: {}", kind, e);
        }
    }
}

/// Reject anything outside the accepted image types
pub fn validate_image_type(mime_type: &str) -> Result<(), PipelineError> {
    if ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "Unsupported file type: {}. Allowed: {}",
            mime_type,
            ALLOWED_IMAGE_TYPES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_type() {
        assert!(validate_image_type("image/png").is_ok());
        assert!(validate_image_type("image/webp").is_ok());

        let err = validate_image_type("application/pdf").unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(err.to_string().contains("application/pdf"));
    }
}
