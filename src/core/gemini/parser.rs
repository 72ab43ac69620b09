use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::models::Venue;
use crate::core::gemini::GeminiError;

static CODE_FENCE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").ok());

/// 取出第一个候选结果里的全部文本片段
pub fn extract_text(response: &Value) -> Result<String, GeminiError> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or(GeminiError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(GeminiError::EmptyResponse);
    }
    Ok(text)
}

/// 模型有时会把 JSON 包在 markdown 代码块里
pub fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| text.trim())
}

pub fn parse_json_payload<T: DeserializeOwned>(response: &Value) -> Result<T, GeminiError> {
    let text = extract_text(response)?;
    let payload = strip_code_fence(&text);
    Ok(serde_json::from_str(payload)?)
}

/// 从 grounding 元数据里取地点，按名称去重
pub fn extract_venues(response: &Value, limit: usize) -> Vec<Venue> {
    let chunks = response
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("groundingMetadata"))
        .and_then(|m| m.get("groundingChunks"))
        .and_then(|c| c.as_array());

    let Some(chunks) = chunks else {
        return Vec::new();
    };

    let mut venues: Vec<Venue> = Vec::new();
    for maps in chunks.iter().filter_map(|chunk| chunk.get("maps")) {
        let title = maps
            .get("title")
            .and_then(|t| t.as_str())
            .filter(|t| !t.trim().is_empty());
        let name = title.unwrap_or("Nearby Venue").to_string();
        let address = title.unwrap_or("Found via Satellite").to_string();
        let url = maps
            .get("uri")
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string();

        if venues.iter().any(|v| v.name == name) {
            continue;
        }
        venues.push(Venue { name, address, url });
        if venues.len() >= limit {
            break;
        }
    }
    venues
}
