use std::path::Path;
use std::time::Duration;

use rivalwatch_app::Pipeline;
use rivalwatch_extract::{ContentExtractor, ExtractorConfig};
use rivalwatch_history::HistoryLog;
use rivalwatch_llm::{AnalysisClient, AnalysisClientConfig, SecondaryConfig};
use secrecy::SecretString;
use serde_json::json;

/// Chat completion body carrying `content`
pub fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

/// Pipeline talking to a single OpenAI-compatible endpoint at `llm_url`
pub async fn pipeline(llm_url: &str, history_path: &Path) -> Pipeline {
    let client = AnalysisClient::new(AnalysisClientConfig {
        primary: None,
        secondary: Some(SecondaryConfig {
            api_key: SecretString::new("test-key".to_string()),
            base_url: llm_url.to_string(),
            model: "gpt-4o-mini".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
        }),
        timeout: Duration::from_secs(5),
    });

    let extractor = ContentExtractor::new(ExtractorConfig {
        timeout: Duration::from_secs(5),
        ..ExtractorConfig::default()
    })
    .unwrap();

    let history = HistoryLog::open(history_path, 10).await.unwrap();

    Pipeline::new(client, extractor, history)
}
