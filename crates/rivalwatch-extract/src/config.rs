//! Extractor configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default user agent for page fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// How pages are fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Single HTTP GET, markup parsed as served
    #[default]
    Static,
    /// Headless browser render, markup read after scripts settle
    Dynamic,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "http" => Ok(ExtractionMode::Static),
            "dynamic" | "browser" => Ok(ExtractionMode::Dynamic),
            other => Err(format!("unknown extraction mode: {} (expected static or dynamic)", other)),
        }
    }
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionMode::Static => write!(f, "static"),
            ExtractionMode::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Content extractor configuration
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub mode: ExtractionMode,
    /// Static fetch timeout
    pub timeout: Duration,
    pub user_agent: String,
    /// Delay after load so client-side scripts can render
    pub settle_wait: Duration,
    /// Hard ceiling on one dynamic render, settle wait included
    pub render_timeout: Duration,
    /// Browser binary; detected automatically when unset
    pub chrome_executable: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Static,
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            settle_wait: Duration::from_secs(5),
            render_timeout: Duration::from_secs(45),
            chrome_executable: None,
        }
    }
}
