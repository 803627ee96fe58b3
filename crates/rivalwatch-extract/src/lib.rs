//! Page fetching and content extraction for rivalwatch
//!
//! Static mode issues one HTTP GET; dynamic mode renders the page in a
//! headless browser first. Both reduce the markup to a title, the first
//! level-1 heading and the first substantial paragraph.

pub mod config;
pub mod error;
pub mod extractor;
pub mod html;
mod fetch;
#[cfg(feature = "browser")]
mod browser;

pub use config::{ExtractionMode, ExtractorConfig, DEFAULT_USER_AGENT};
pub use error::ExtractError;
pub use extractor::{normalize_url, ContentExtractor};
pub use html::extract_page;
