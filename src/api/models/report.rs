use serde::{Deserialize, Serialize};

use super::verdict::{RejectionReason, ViolationVerdict};

/// 地点标记
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// 分析完成、等待用户编辑的举报草稿
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReport {
    pub id: String,
    /// 毫秒时间戳
    pub timestamp: i64,
    pub author: String,
    #[serde(with = "base64_bytes")]
    pub image_jpeg: Vec<u8>,
    pub location: Option<GeoPoint>,
    pub verdict: ViolationVerdict,
    /// 实际被打码的区域数量
    pub redacted_regions: u32,
}

impl DraftReport {
    pub fn is_rejected(&self) -> bool {
        !self.verdict.is_vehicle
    }
}

/// 已发布的举报，插入存储后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub timestamp: i64,
    pub author: String,
    #[serde(with = "base64_bytes")]
    pub image_jpeg: Vec<u8>,
    pub headline: String,
    pub points: u32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub user_message: String,
    pub idiocy_score: u8,
    #[serde(default)]
    pub idiocy_category: String,
    pub confidence: u8,
    pub is_vehicle: bool,
    #[serde(default)]
    pub rejection_reason: Option<RejectionReason>,
}

/// 图片在 JSON 中以 base64 字符串保存
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
