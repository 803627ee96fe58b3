//! Shared server state

use std::sync::Arc;

use rivalwatch_extract::ContentExtractor;
use rivalwatch_history::HistoryLog;
use rivalwatch_llm::AnalysisClient;

use crate::config::Settings;
use crate::pipeline::Pipeline;

/// Handed to every handler; providers, extractor and history are built once
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = AnalysisClient::new(settings.analysis_client_config());
        let extractor = ContentExtractor::new(settings.extractor_config())?;
        let history = HistoryLog::open(&settings.history_file, settings.max_history_items).await?;

        Ok(Self::from_pipeline(Pipeline::new(client, extractor, history)))
    }

    pub fn from_pipeline(pipeline: Pipeline) -> Self {
        Self { pipeline: Arc::new(pipeline) }
    }
}
