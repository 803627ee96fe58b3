//! Content extractor

use reqwest::Client;
use rivalwatch_core::ExtractedPage;
use tracing::info;

use crate::config::{ExtractionMode, ExtractorConfig};
use crate::error::ExtractError;
use crate::fetch;
use crate::html::extract_page;

/// Fetches pages and reduces them to an `ExtractedPage`
pub struct ContentExtractor {
    client: Client,
    config: ExtractorConfig,
}

impl ContentExtractor {
    /// Create an extractor; the HTTP client is built once and reused
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = fetch::build_client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    /// Configured extraction mode
    pub fn mode(&self) -> ExtractionMode {
        self.config.mode
    }

    /// Fetch `url` (scheme optional) and extract its summary
    ///
    /// Only transport failures are errors; missing fields are `None`.
    pub async fn extract(&self, url: &str) -> Result<ExtractedPage, ExtractError> {
        let url = normalize_url(url);
        info!("Extracting {} ({} mode)", url, self.config.mode);

        let html = match self.config.mode {
            ExtractionMode::Static => {
                fetch::fetch_html(&self.client, &url, self.config.timeout).await?
            }
            ExtractionMode::Dynamic => self.render(&url).await?,
        };

        Ok(extract_page(&html, &url))
    }

    /// Render on its own task so the browser lifecycle never runs on the
    /// caller's task
    #[cfg(feature = "browser")]
    async fn render(&self, url: &str) -> Result<String, ExtractError> {
        tokio::spawn(crate::browser::render_html(url.to_string(), self.config.clone()))
            .await
            .map_err(|e| ExtractError::Browser(format!("render task failed: {}", e)))?
    }

    #[cfg(not(feature = "browser"))]
    async fn render(&self, _url: &str) -> Result<String, ExtractError> {
        Err(ExtractError::BrowserUnavailable)
    }
}

/// Prepend `https://` when the URL has no http(s) scheme
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com/news"), "https://example.com/news");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("  example.com "), "https://example.com");
    }

    #[test]
    fn test_schemeless_equals_prefixed() {
        assert_eq!(normalize_url("consultant.example/law"), normalize_url("https://consultant.example/law"));
    }
}
