//! Shared type definitions

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on items kept in any analysis list field
pub const MAX_LIST_ITEMS: usize = 7;

/// Kind of analysis request
///
/// Selects the prompt template and the result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Free text (landing copy, service description, ad)
    Text,
    /// Uploaded image (banner, site screenshot)
    Image,
    /// Page fetched from a URL and reduced to an `ExtractedPage`
    #[serde(rename = "parse", alias = "parsed_page")]
    ParsedPage,
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisKind::Text => write!(f, "text"),
            AnalysisKind::Image => write!(f, "image"),
            AnalysisKind::ParsedPage => write!(f, "parse"),
        }
    }
}

/// Structured analysis of a competitor offering or a news-like page
///
/// Text requests only fill the competitor group. Page requests fill either
/// the competitor group or the news group, sometimes both, sometimes neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub unique_offers: Vec<String>,
    pub recommendations: Vec<String>,
    /// Always present; empty only when nothing could be decoded
    pub summary: String,
    pub news_highlights: Vec<String>,
    pub attention_points: Vec<String>,
    pub key_topics: Vec<String>,
}

impl CompetitorAnalysis {
    /// Analysis carrying only a summary line
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    /// Whether any of the competitor-offering lists is populated
    pub fn has_offer_fields(&self) -> bool {
        !(self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.unique_offers.is_empty()
            && self.recommendations.is_empty())
    }

    /// Whether any of the news lists is populated
    pub fn has_news_fields(&self) -> bool {
        !(self.news_highlights.is_empty()
            && self.attention_points.is_empty()
            && self.key_topics.is_empty())
    }
}

/// Visual marketing analysis of an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub description: String,
    pub marketing_insights: Vec<String>,
    /// Always within 0..=10
    pub visual_style_score: u8,
    pub visual_style_analysis: String,
    pub recommendations: Vec<String>,
}

impl ImageAnalysis {
    /// Score used when the model gives none
    pub const DEFAULT_SCORE: u8 = 5;
    /// Highest allowed score
    pub const MAX_SCORE: u8 = 10;

    /// Clamp an arbitrary model-provided score into the published range
    pub fn clamp_score(raw: i64) -> u8 {
        raw.clamp(0, i64::from(Self::MAX_SCORE)) as u8
    }
}

impl Default for ImageAnalysis {
    fn default() -> Self {
        Self {
            description: String::new(),
            marketing_insights: Vec::new(),
            visual_style_score: Self::DEFAULT_SCORE,
            visual_style_analysis: String::new(),
            recommendations: Vec::new(),
        }
    }
}

/// Summary of a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Content of the first `<title>`
    pub title: Option<String>,
    /// Text of the first `<h1>`
    pub heading: Option<String>,
    /// First paragraph longer than 50 characters, cut to 500
    pub excerpt: Option<String>,
    /// URL that was fetched (after scheme normalization)
    pub source_url: String,
}

impl ExtractedPage {
    /// Maximum excerpt length in characters
    pub const EXCERPT_MAX_CHARS: usize = 500;
    /// Paragraphs must be strictly longer than this to become the excerpt
    pub const EXCERPT_MIN_CHARS: usize = 50;

    /// True when none of the content fields could be extracted
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.heading.is_none() && self.excerpt.is_none()
    }
}

/// One completed analysis in the recent-activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Written as RFC 3339; offset-less local times from older logs are accepted
    #[serde(deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "request_type")]
    pub kind: AnalysisKind,
    pub request_summary: String,
    pub response_summary: String,
    /// Full analysis payload, opaque to the log
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// Maximum request summary length in characters
    pub const REQUEST_SUMMARY_MAX_CHARS: usize = 200;
    /// Maximum response summary length in characters
    pub const RESPONSE_SUMMARY_MAX_CHARS: usize = 500;
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` read as local time
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;

    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc()),
    )
}

/// Cut a string to at most `max_chars` characters (not bytes)
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
