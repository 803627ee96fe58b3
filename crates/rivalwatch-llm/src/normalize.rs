//! Turn a decoded model reply into fully populated result shapes
//!
//! Decoding goes into partial structs whose fields are all optional and
//! forgiving about types; defaults are filled in afterwards.

use rivalwatch_core::{CompetitorAnalysis, ImageAnalysis, MAX_LIST_ITEMS};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialCompetitorAnalysis {
    #[serde(deserialize_with = "lenient_list")]
    strengths: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    weaknesses: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    unique_offers: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    recommendations: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text")]
    summary: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    news_highlights: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    attention_points: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    key_topics: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialImageAnalysis {
    #[serde(deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    marketing_insights: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_score")]
    visual_style_score: Option<i64>,
    #[serde(deserialize_with = "lenient_text")]
    visual_style_analysis: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    recommendations: Option<Vec<String>>,
}

/// Build a `CompetitorAnalysis` from a decoded reply, defaulting what is missing
pub fn competitor_analysis(object: Map<String, Value>) -> CompetitorAnalysis {
    let partial: PartialCompetitorAnalysis = decode_partial(object);

    CompetitorAnalysis {
        strengths: capped(partial.strengths),
        weaknesses: capped(partial.weaknesses),
        unique_offers: capped(partial.unique_offers),
        recommendations: capped(partial.recommendations),
        summary: partial.summary.unwrap_or_default(),
        news_highlights: capped(partial.news_highlights),
        attention_points: capped(partial.attention_points),
        key_topics: capped(partial.key_topics),
    }
}

/// Build an `ImageAnalysis` from a decoded reply, defaulting what is missing
/// and clamping the score into 0..=10
pub fn image_analysis(object: Map<String, Value>) -> ImageAnalysis {
    let partial: PartialImageAnalysis = decode_partial(object);

    ImageAnalysis {
        description: partial.description.unwrap_or_default(),
        marketing_insights: capped(partial.marketing_insights),
        visual_style_score: partial
            .visual_style_score
            .map(ImageAnalysis::clamp_score)
            .unwrap_or(ImageAnalysis::DEFAULT_SCORE),
        visual_style_analysis: partial.visual_style_analysis.unwrap_or_default(),
        recommendations: capped(partial.recommendations),
    }
}

fn decode_partial<T: Default + for<'de> Deserialize<'de>>(object: Map<String, Value>) -> T {
    serde_json::from_value(Value::Object(object)).unwrap_or_else(|e| {
        warn!("Discarding undecodable model reply: {}", e);
        T::default()
    })
}

fn capped(list: Option<Vec<String>>) -> Vec<String> {
    let mut list = list.unwrap_or_default();
    list.truncate(MAX_LIST_ITEMS);
    list
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(scalar_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.trim().to_string()]),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    })
}
