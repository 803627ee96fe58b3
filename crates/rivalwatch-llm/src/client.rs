//! Analysis client with provider selection and result normalization
//!
//! Text and page requests go to the primary provider when it has a
//! credential: first its configured endpoint, then, when that is a distinct
//! custom endpoint, once more against the well-known one. A primary that
//! fails is an error; it is never masked by switching to the secondary
//! provider. Without a primary credential the secondary provider is used
//! directly. Image requests always go to the vision provider.
//!
//! An empty completion counts as a failure only for the retry decision.
//! Everywhere else it decodes like any other unusable reply, into defaults.

use std::time::Duration;

use rivalwatch_core::{CompetitorAnalysis, ExtractedPage, ImageAnalysis};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::error::LlmError;
use crate::normalize;
use crate::openai::{
    OpenAiCompatProvider, DEEPSEEK_API_URL, DEFAULT_DEEPSEEK_MODEL, DEFAULT_OPENAI_MODEL,
    OPENAI_API_URL,
};
use crate::parser::parse_json_object;
use crate::prompts;
use crate::provider::{ChatMessage, ChatProvider};

/// Summary returned for pages where nothing could be extracted
pub const EMPTY_PAGE_SUMMARY: &str = "Could not extract any content from the page for analysis";

/// Primary (preferred) provider settings
#[derive(Debug, Clone)]
pub struct PrimaryConfig {
    pub api_key: SecretString,
    /// Configured endpoint; may be a custom proxy or mirror
    pub base_url: String,
    /// Well-known endpoint used for the single retry
    pub standard_url: String,
    pub model: String,
}

impl PrimaryConfig {
    /// DeepSeek on its public endpoint
    pub fn deepseek(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: DEEPSEEK_API_URL.to_string(),
            standard_url: DEEPSEEK_API_URL.to_string(),
            model: DEFAULT_DEEPSEEK_MODEL.to_string(),
        }
    }
}

/// Secondary provider settings, also used for vision requests
#[derive(Debug, Clone)]
pub struct SecondaryConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub vision_model: String,
}

impl SecondaryConfig {
    /// OpenAI on its public endpoint
    pub fn openai(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: OPENAI_API_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            vision_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

/// Analysis client configuration
#[derive(Debug, Clone)]
pub struct AnalysisClientConfig {
    pub primary: Option<PrimaryConfig>,
    pub secondary: Option<SecondaryConfig>,
    /// Per completion call
    pub timeout: Duration,
}

impl Default for AnalysisClientConfig {
    fn default() -> Self {
        Self {
            primary: None,
            secondary: None,
            timeout: Duration::from_secs(60),
        }
    }
}

struct PrimaryEndpoints {
    configured: OpenAiCompatProvider,
    /// `None` when the configured endpoint already is the standard one
    standard: Option<OpenAiCompatProvider>,
}

/// Client producing normalized analyses from chat providers
pub struct AnalysisClient {
    primary: Option<PrimaryEndpoints>,
    secondary: Option<OpenAiCompatProvider>,
    vision: Option<OpenAiCompatProvider>,
}

impl AnalysisClient {
    /// Build all providers once from configuration
    pub fn new(config: AnalysisClientConfig) -> Self {
        let timeout = config.timeout;

        let primary = config.primary.map(|p| {
            let standard_url = p.standard_url.trim();
            let configured_url = if p.base_url.trim().is_empty() {
                standard_url
            } else {
                p.base_url.trim()
            };

            let standard = (configured_url.trim_end_matches('/') != standard_url.trim_end_matches('/'))
                .then(|| {
                    OpenAiCompatProvider::with_timeout(
                        "DeepSeek",
                        standard_url,
                        p.api_key.clone(),
                        &p.model,
                        timeout,
                    )
                });

            PrimaryEndpoints {
                configured: OpenAiCompatProvider::with_timeout(
                    "DeepSeek",
                    configured_url,
                    p.api_key,
                    &p.model,
                    timeout,
                ),
                standard,
            }
        });

        let (secondary, vision) = match config.secondary {
            Some(s) => (
                Some(OpenAiCompatProvider::with_timeout(
                    "OpenAI",
                    &s.base_url,
                    s.api_key.clone(),
                    &s.model,
                    timeout,
                )),
                Some(OpenAiCompatProvider::with_timeout(
                    "OpenAI",
                    &s.base_url,
                    s.api_key,
                    &s.vision_model,
                    timeout,
                )),
            ),
            None => (None, None),
        };

        Self { primary, secondary, vision }
    }

    /// Name and model of the provider text requests will use
    pub fn text_provider(&self) -> Option<(&'static str, &str)> {
        if let Some(primary) = &self.primary {
            return Some((primary.configured.name(), primary.configured.model()));
        }
        self.secondary.as_ref().map(|s| (s.name(), s.model()))
    }

    /// Name and model of the provider image requests will use
    pub fn vision_provider(&self) -> Option<(&'static str, &str)> {
        self.vision.as_ref().map(|v| (v.name(), v.model()))
    }

    /// Analyze free text
    pub async fn analyze_text(&self, text: &str) -> Result<CompetitorAnalysis, LlmError> {
        let reply = self.chat_text(&prompts::text_messages(text)).await?;
        Ok(normalize::competitor_analysis(parse_json_object(&reply)))
    }

    /// Analyze an image with the vision provider (no fallback)
    pub async fn analyze_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ImageAnalysis, LlmError> {
        let vision = self.vision.as_ref().ok_or(LlmError::ApiKeyMissing(
            "OPENAI_API_KEY is required for image analysis",
        ))?;

        info!("Analyzing image with {} (model: {})", vision.name(), vision.model());

        let reply = vision.complete(&prompts::image_messages(image, mime_type)).await?;
        Ok(normalize::image_analysis(parse_json_object(&reply)))
    }

    /// Analyze an extracted page
    ///
    /// Pages with no title, heading or excerpt are answered locally.
    pub async fn analyze_page(&self, page: &ExtractedPage) -> Result<CompetitorAnalysis, LlmError> {
        let Some(content) = prompts::page_content(page) else {
            info!("Nothing extracted from {}, skipping model call", page.source_url);
            return Ok(CompetitorAnalysis::with_summary(EMPTY_PAGE_SUMMARY));
        };

        let reply = self.chat_text(&prompts::page_messages(&content)).await?;
        Ok(normalize::competitor_analysis(parse_json_object(&reply)))
    }

    async fn chat_text(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if let Some(primary) = &self.primary {
            return complete_with_retry(&primary.configured, primary.standard.as_ref(), messages).await;
        }

        let secondary = self.secondary.as_ref().ok_or(LlmError::ApiKeyMissing(
            "set DEEPSEEK_API_KEY or OPENAI_API_KEY",
        ))?;

        info!("No primary credential, using {} (model: {})", secondary.name(), secondary.model());
        secondary.complete(messages).await
    }
}

/// One attempt against `configured`, one retry against `standard` if there
/// is one
///
/// Without a retry target an empty reply is returned as is.
async fn complete_with_retry<P: ChatProvider>(
    configured: &P,
    standard: Option<&P>,
    messages: &[ChatMessage],
) -> Result<String, LlmError> {
    info!("Analyzing with {} (model: {})", configured.name(), configured.model());

    let failure = match configured.complete(messages).await {
        Ok(reply) if !reply.is_empty() => return Ok(reply),
        Ok(_) => LlmError::EmptyResponse(configured.name()),
        Err(e) => e,
    };

    let Some(standard) = standard else {
        return match failure {
            LlmError::EmptyResponse(_) => Ok(String::new()),
            e => Err(e),
        };
    };

    warn!(
        "{} configured endpoint failed ({}), retrying on standard endpoint",
        configured.name(),
        failure
    );
    standard.complete(messages).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::new("test-key".to_string())
    }

    #[test]
    fn test_primary_wins_text_routing() {
        let client = AnalysisClient::new(AnalysisClientConfig {
            primary: Some(PrimaryConfig::deepseek(key())),
            secondary: Some(SecondaryConfig::openai(key())),
            ..AnalysisClientConfig::default()
        });

        assert_eq!(client.text_provider(), Some(("DeepSeek", "deepseek-chat")));
        assert_eq!(client.vision_provider(), Some(("OpenAI", "gpt-4o-mini")));
    }

    #[test]
    fn test_empty_custom_url_uses_standard() {
        let mut primary = PrimaryConfig::deepseek(key());
        primary.base_url = "  ".to_string();

        let client = AnalysisClient::new(AnalysisClientConfig {
            primary: Some(primary),
            ..AnalysisClientConfig::default()
        });

        let endpoints = client.primary.as_ref().unwrap();
        assert_eq!(endpoints.configured.base_url(), DEEPSEEK_API_URL);
        assert!(endpoints.standard.is_none());
        assert!(client.vision_provider().is_none());
    }

    #[test]
    fn test_distinct_custom_url_keeps_retry_target() {
        let mut primary = PrimaryConfig::deepseek(key());
        primary.base_url = "https://proxy.example/v1/".to_string();

        let client = AnalysisClient::new(AnalysisClientConfig {
            primary: Some(primary),
            ..AnalysisClientConfig::default()
        });

        let endpoints = client.primary.as_ref().unwrap();
        assert_eq!(endpoints.configured.base_url(), "https://proxy.example/v1");
        assert_eq!(endpoints.standard.as_ref().unwrap().base_url(), DEEPSEEK_API_URL);
    }

    #[test]
    fn test_default_urls_have_no_retry_target() {
        let mut primary = PrimaryConfig::deepseek(key());
        primary.base_url = format!("{}/", DEEPSEEK_API_URL);

        let client = AnalysisClient::new(AnalysisClientConfig {
            primary: Some(primary),
            ..AnalysisClientConfig::default()
        });

        assert!(client.primary.as_ref().unwrap().standard.is_none());
    }

    #[tokio::test]
    async fn test_no_credentials_is_configuration_error() {
        let client = AnalysisClient::new(AnalysisClientConfig::default());

        let err = client.analyze_text("some competitor text").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiKeyMissing(_)));
        assert!(!err.is_transport());

        let err = client.analyze_image(&[1, 2, 3], "image/png").await.unwrap_err();
        assert!(matches!(err, LlmError::ApiKeyMissing(_)));
    }

    #[tokio::test]
    async fn test_empty_page_short_circuits() {
        let client = AnalysisClient::new(AnalysisClientConfig::default());
        let page = ExtractedPage {
            source_url: "https://blank.example".to_string(),
            ..ExtractedPage::default()
        };

        let analysis = client.analyze_page(&page).await.unwrap();
        assert_eq!(analysis.summary, EMPTY_PAGE_SUMMARY);
        assert!(!analysis.has_offer_fields());
        assert!(!analysis.has_news_fields());
    }
}
