//! Runtime settings, read from the environment (and `.env`) or flags

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rivalwatch_extract::{ExtractionMode, ExtractorConfig, DEFAULT_USER_AGENT};
use rivalwatch_llm::{AnalysisClientConfig, PrimaryConfig, SecondaryConfig};
use secrecy::SecretString;

#[derive(Debug, Clone, Parser)]
#[command(name = "rivalwatch")]
#[command(about = "Competitor monitoring assistant")]
#[command(version)]
pub struct Settings {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "API_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Secondary and vision provider key
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub openai_api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub openai_model: String,

    #[arg(long, env = "OPENAI_VISION_MODEL", default_value = "gpt-4o-mini")]
    pub openai_vision_model: String,

    /// Primary provider key
    #[arg(long, env = "DEEPSEEK_API_KEY", default_value = "", hide_env_values = true)]
    pub deepseek_api_key: String,

    /// Primary endpoint tried first; may point at a proxy
    #[arg(long, env = "DEEPSEEK_BASE_URL", default_value = "https://api.deepseek.com")]
    pub deepseek_base_url: String,

    /// Primary endpoint used for the single retry
    #[arg(long, env = "DEEPSEEK_STANDARD_URL", default_value = "https://api.deepseek.com")]
    pub deepseek_standard_url: String,

    #[arg(long, env = "DEEPSEEK_MODEL", default_value = "deepseek-chat")]
    pub deepseek_model: String,

    /// Seconds per completion call
    #[arg(long, env = "LLM_TIMEOUT", default_value_t = 60)]
    pub llm_timeout: u64,

    #[arg(long, env = "HISTORY_FILE", default_value = "history.json")]
    pub history_file: PathBuf,

    #[arg(long, env = "MAX_HISTORY_ITEMS", default_value_t = 10)]
    pub max_history_items: usize,

    /// Seconds per page fetch
    #[arg(long, env = "PARSER_TIMEOUT", default_value_t = 10)]
    pub parser_timeout: u64,

    #[arg(long, env = "PARSER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub parser_user_agent: String,

    /// `static` or `dynamic`
    #[arg(long, env = "EXTRACTION_MODE", default_value = "static")]
    pub extraction_mode: ExtractionMode,

    /// Older switch for dynamic mode
    #[arg(
        long,
        env = "USE_SELENIUM",
        default_value_t = false,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub use_selenium: bool,

    /// Seconds to let scripts settle after load in dynamic mode (default 5)
    #[arg(long, env = "PARSER_BROWSER_WAIT")]
    pub parser_browser_wait: Option<u64>,

    /// Older name for the settle wait
    #[arg(long, env = "PARSER_SELENIUM_WAIT")]
    pub parser_selenium_wait: Option<u64>,

    /// Hard ceiling in seconds for one dynamic render
    #[arg(long, env = "PARSER_RENDER_TIMEOUT", default_value_t = 45)]
    pub parser_render_timeout: u64,

    #[arg(long, env = "CHROME_EXECUTABLE")]
    pub chrome_executable: Option<PathBuf>,

    /// Directory with the web UI; served at `/` and `/static` when set
    #[arg(long, env = "FRONTEND_DIR")]
    pub frontend_dir: Option<PathBuf>,
}

const DEFAULT_SETTLE_WAIT_SECS: u64 = 5;

impl Settings {
    /// Extraction mode after applying the legacy switch
    pub fn effective_extraction_mode(&self) -> ExtractionMode {
        if self.use_selenium {
            ExtractionMode::Dynamic
        } else {
            self.extraction_mode
        }
    }

    /// Settle wait after applying the legacy key
    pub fn settle_wait(&self) -> Duration {
        let secs = self
            .parser_browser_wait
            .or(self.parser_selenium_wait)
            .unwrap_or(DEFAULT_SETTLE_WAIT_SECS);
        Duration::from_secs(secs)
    }

    pub fn analysis_client_config(&self) -> AnalysisClientConfig {
        let primary = non_empty(&self.deepseek_api_key).map(|key| PrimaryConfig {
            api_key: key,
            base_url: self.deepseek_base_url.clone(),
            standard_url: self.deepseek_standard_url.clone(),
            model: self.deepseek_model.clone(),
        });

        let secondary = non_empty(&self.openai_api_key).map(|key| SecondaryConfig {
            api_key: key,
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            vision_model: self.openai_vision_model.clone(),
        });

        AnalysisClientConfig {
            primary,
            secondary,
            timeout: Duration::from_secs(self.llm_timeout),
        }
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            mode: self.effective_extraction_mode(),
            timeout: Duration::from_secs(self.parser_timeout),
            user_agent: self.parser_user_agent.clone(),
            settle_wait: self.settle_wait(),
            render_timeout: Duration::from_secs(self.parser_render_timeout),
            chrome_executable: self.chrome_executable.clone(),
        }
    }
}

/// Blank keys count as unset
fn non_empty(key: &str) -> Option<SecretString> {
    let key = key.trim();
    (!key.is_empty()).then(|| SecretString::new(key.to_string()))
}
