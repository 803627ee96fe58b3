//! Extract a JSON object from a free-form model reply
//!
//! Models wrap their JSON in prose or code fences and sometimes produce
//! something that is not JSON at all. None of that is an error here: the
//! worst case is an empty object.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fenced block pattern is valid")
});

/// Decode the best-effort JSON object found in `reply`
///
/// 1. If a fenced block (optionally tagged `json`) exists, keep its inner text.
/// 2. Keep the span from the first `{` to the last `}`.
/// 3. Decode strictly; anything other than an object yields an empty map.
pub fn parse_json_object(reply: &str) -> Map<String, Value> {
    let mut candidate = reply;

    if let Some(inner) = FENCED_BLOCK.captures(candidate).and_then(|c| c.get(1)) {
        candidate = inner.as_str();
    }

    if let (Some(start), Some(end)) = (candidate.find('{'), candidate.rfind('}')) {
        if start < end {
            candidate = &candidate[start..=end];
        }
    }

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!("Model reply decoded to a non-object JSON value: {}", json_kind(&other));
            Map::new()
        }
        Err(e) => {
            debug!("Model reply is not valid JSON: {}", e);
            Map::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
