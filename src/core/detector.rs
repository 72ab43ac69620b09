use log::{info, warn};

use crate::api::models::SensitiveRegion;
use crate::core::gemini::{parser, prompts, GeminiClient, GeminiError, InlineImage};

/// 敏感区域检测
///
/// 实现方不得返回错误：任何失败都退化为空列表，
/// 流水线宁可不打码也不能卡住用户。
pub trait RegionDetector: Send + Sync {
    fn detect(&self, image_jpeg: &[u8]) -> Vec<SensitiveRegion>;
}

pub struct GeminiRegionDetector {
    client: GeminiClient,
    model: String,
}

impl GeminiRegionDetector {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn try_detect(&self, image_jpeg: &[u8]) -> Result<Vec<SensitiveRegion>, GeminiError> {
        let response = self.client.generate_json(
            &self.model,
            &InlineImage::jpeg(image_jpeg),
            prompts::DETECTION_PROMPT,
            prompts::detection_schema(),
        )?;
        parser::parse_json_payload(&response)
    }
}

impl RegionDetector for GeminiRegionDetector {
    fn detect(&self, image_jpeg: &[u8]) -> Vec<SensitiveRegion> {
        match self.try_detect(image_jpeg) {
            Ok(regions) => {
                info!("🔍 Detected {} sensitive regions", regions.len());
                regions
            }
            Err(e) => {
                warn!("⚠️ Region detection failed, continuing without redaction: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn test_network_error_yields_empty_regions() {
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            "key",
            Duration::from_secs(2),
            RetryPolicy::no_retry(),
        )
        .unwrap();
        let detector = GeminiRegionDetector::new(client, "vision");
        assert!(detector.detect(&[0xFF, 0xD8]).is_empty());
    }
}
