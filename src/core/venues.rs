//! 地点标记查询（Maps grounding）

use log::{info, warn};
use serde_json::json;

use crate::api::models::{GeoPoint, Venue};
use crate::core::gemini::{parser, prompts, GeminiClient, GeminiError};

pub const MAX_VENUES: usize = 5;

pub struct VenueLookup {
    client: GeminiClient,
    model: String,
}

impl VenueLookup {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// 查询附近地点，失败时返回空列表。没有定位时以 (0, 0) 加关键字搜索
    pub fn search(&self, location: Option<GeoPoint>, query: Option<&str>) -> Vec<Venue> {
        let point = location.unwrap_or(GeoPoint { lat: 0.0, lng: 0.0 });
        match self.try_search(point, query) {
            Ok(venues) => {
                info!("📍 Found {} venues", venues.len());
                venues
            }
            Err(e) => {
                warn!("⚠️ Venue lookup failed: {}", e);
                Vec::new()
            }
        }
    }

    fn try_search(&self, point: GeoPoint, query: Option<&str>) -> Result<Vec<Venue>, GeminiError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompts::venue_prompt(point.lat, point.lng, query) }]
            }],
            "tools": [{ "googleMaps": {} }],
            "toolConfig": {
                "retrievalConfig": {
                    "latLng": { "latitude": point.lat, "longitude": point.lng }
                }
            }
        });
        let response = self.client.generate_content(&self.model, &body)?;
        Ok(parser::extract_venues(&response, MAX_VENUES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn test_lookup_failure_is_empty() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            "key",
            Duration::from_secs(2),
            RetryPolicy::no_retry(),
        )
        .unwrap();
        let lookup = VenueLookup::new(client, "maps");
        assert!(lookup.search(None, Some("station")).is_empty());
    }
}
