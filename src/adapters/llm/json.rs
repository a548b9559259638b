//! Extraction of JSON objects from model output.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Finds the JSON object in `text`.
///
/// Accepts a bare object, an object inside a fenced code block, or an
/// object surrounded by prose. Returns `None` when no object parses.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Extracts and deserializes the JSON object in `text`.
pub fn parse_json_contract<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    let value = extract_json_object(text).ok_or_else(|| "no JSON object in response".to_string())?;
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Shortens model output for log lines.
pub fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{}…", head)
    }
}
