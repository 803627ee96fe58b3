//! OpenAI-compatible chat completions provider
//!
//! DeepSeek and OpenAI both speak this wire format; they differ only in base
//! URL, credential and model.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::provider::{ChatMessage, ChatProvider, MAX_TOKENS, TEMPERATURE};

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEEPSEEK_API_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chat provider for any OpenAI-compatible endpoint
pub struct OpenAiCompatProvider {
    client: Client,
    name: &'static str,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiCompatProvider {
    /// Create a provider against `base_url` (without the `/chat/completions` suffix)
    pub fn new(name: &'static str, base_url: &str, api_key: SecretString, model: &str) -> Self {
        Self::with_timeout(name, base_url, api_key, model, DEFAULT_TIMEOUT)
    }

    /// Create with an explicit per-request timeout
    pub fn with_timeout(
        name: &'static str,
        base_url: &str,
        api_key: SecretString,
        model: &str,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for {}: {}", name, e);
                Client::new()
            });

        Self {
            client,
            name,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    /// Endpoint base this provider talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl ChatProvider for OpenAiCompatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = self.completions_url();
        debug!("Sending request to {} at {}", self.name, url);

        let response = self.client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(LlmError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("{} API error: {} - {}", self.name, status, error_text);
            return Err(LlmError::RequestFailed(format!("{}: {}", status, error_text)));
        }

        let response: CompletionResponse = response.json().await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = response.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            debug!("{} returned an empty completion", self.name);
        }

        Ok(content)
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_strips_trailing_slash() {
        let provider = OpenAiCompatProvider::new(
            "DeepSeek",
            "https://api.deepseek.com/",
            SecretString::new("k".to_string()),
            DEFAULT_DEEPSEEK_MODEL,
        );
        assert_eq!(provider.base_url(), DEEPSEEK_API_URL);
        assert_eq!(provider.completions_url(), "https://api.deepseek.com/chat/completions");
        assert_eq!(provider.model(), "deepseek-chat");
        assert_eq!(provider.name(), "DeepSeek");
    }
}
