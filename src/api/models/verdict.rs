use serde::{Deserialize, Deserializer, Serialize};

/// 单条举报最多可得的分数（基础 5 + 违规 15 + 高置信 5）
pub const MAX_REPORT_POINTS: u32 = 25;

/// 低于该置信度的判定一律视为不确定
pub const MIN_CONFIDENCE: u8 = 80;

/// 驳回原因
///
/// `SystemError` 表示分析服务本身不可用，与内容质量问题区分开，
/// UI 据此提示"稍后重试"而不是"重新拍摄"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    LowQuality,
    NoViolation,
    UncertainViolation,
    NotAVehicle,
    SystemError,
    #[serde(other)]
    Unrecognized,
}

impl RejectionReason {
    pub fn is_system_failure(&self) -> bool {
        matches!(self, RejectionReason::SystemError)
    }
}

/// 违停分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationVerdict {
    pub headline: String,
    #[serde(deserialize_with = "lenient_points")]
    pub points: u32,
    #[serde(default)]
    pub reasoning: String,
    /// 0-100，违规可能性
    #[serde(deserialize_with = "lenient_percent")]
    pub idiocy_score: u8,
    #[serde(default)]
    pub idiocy_category: String,
    pub is_vehicle: bool,
    /// 0-100
    #[serde(deserialize_with = "lenient_percent")]
    pub confidence: u8,
    #[serde(default)]
    pub rejection_reason: Option<RejectionReason>,
}

impl ViolationVerdict {
    /// 远程调用失败时返回的哨兵结果
    pub fn system_failure() -> Self {
        Self {
            headline: "Error Analyzing Image".to_string(),
            points: 0,
            reasoning: "SYSTEM_OFFLINE".to_string(),
            idiocy_score: 0,
            idiocy_category: "Unknown".to_string(),
            is_vehicle: false,
            confidence: 0,
            rejection_reason: Some(RejectionReason::SystemError),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.is_vehicle && self.rejection_reason.is_none()
    }

    pub fn is_system_failure(&self) -> bool {
        self.rejection_reason
            .map(|r| r.is_system_failure())
            .unwrap_or(false)
    }

    /// 强制本地不变式：
    /// - 分数和置信度限制在 0-100，单条分数不超过 [`MAX_REPORT_POINTS`]
    /// - 置信度不足的通过判定改为 `UncertainViolation`
    /// - 非车辆判定分数为 0 且必须带驳回原因
    pub fn normalized(mut self) -> Self {
        self.idiocy_score = self.idiocy_score.min(100);
        self.confidence = self.confidence.min(100);
        self.points = self.points.min(MAX_REPORT_POINTS);

        if self.is_vehicle && self.confidence < MIN_CONFIDENCE {
            self.is_vehicle = false;
            self.rejection_reason
                .get_or_insert(RejectionReason::UncertainViolation);
        }

        if self.is_vehicle {
            // 模型偶尔会在通过的判定里留下空的 rejectionReason
            self.rejection_reason = None;
        } else {
            self.points = 0;
            self.rejection_reason.get_or_insert(RejectionReason::NotAVehicle);
        }

        self
    }
}

// 模型的 NUMBER 字段可能带小数或为负数
fn lenient_points<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn lenient_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(points: u32, confidence: u8) -> ViolationVerdict {
        ViolationVerdict {
            headline: "Sidewalk Obstruction".to_string(),
            points,
            reasoning: "Great catch! Evidence is clear.".to_string(),
            idiocy_score: 90,
            idiocy_category: "Sidewalk".to_string(),
            is_vehicle: true,
            confidence,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_parse_model_json() {
        let json = r#"{
            "headline": "Double Parking Detected",
            "points": 20,
            "reasoning": "Great catch!",
            "idiocyScore": 88,
            "idiocyCategory": "Double Parking",
            "isVehicle": true,
            "confidence": 85,
            "rejectionReason": null
        }"#;
        let verdict: ViolationVerdict = serde_json::from_str(json).expect("解析失败");
        assert_eq!(verdict.points, 20);
        assert_eq!(verdict.idiocy_category, "Double Parking");
        assert!(verdict.is_accepted());
    }

    #[test]
    fn test_parse_fractional_numbers() {
        let json = r#"{"headline":"x","points":19.6,"idiocyScore":140.2,"isVehicle":true,
            "confidence":91.4}"#;
        let verdict: ViolationVerdict = serde_json::from_str(json).unwrap();
        assert_eq!(verdict.points, 20);
        assert_eq!(verdict.idiocy_score, 100);
        assert_eq!(verdict.confidence, 91);
    }

    #[test]
    fn test_parse_unknown_rejection_reason() {
        let json = r#"{"headline":"x","points":0,"idiocyScore":0,"isVehicle":false,
            "confidence":10,"rejectionReason":"TOO_DARK"}"#;
        let verdict: ViolationVerdict = serde_json::from_str(json).unwrap();
        assert_eq!(verdict.rejection_reason, Some(RejectionReason::Unrecognized));
    }

    #[test]
    fn test_system_failure_is_distinct_from_content_rejection() {
        let sentinel = ViolationVerdict::system_failure();
        assert!(sentinel.is_system_failure());
        assert_eq!(sentinel.points, 0);
        assert!(!sentinel.is_vehicle);

        let rejected = ViolationVerdict {
            is_vehicle: false,
            rejection_reason: Some(RejectionReason::LowQuality),
            ..accepted(0, 95)
        };
        assert!(!rejected.is_system_failure());
    }

    #[test]
    fn test_normalized_caps_points() {
        let verdict = accepted(400, 95).normalized();
        assert_eq!(verdict.points, MAX_REPORT_POINTS);
        assert!(verdict.is_accepted());
    }

    #[test]
    fn test_normalized_low_confidence_is_rejected() {
        let verdict = accepted(20, 60).normalized();
        assert!(!verdict.is_vehicle);
        assert_eq!(verdict.points, 0);
        assert_eq!(
            verdict.rejection_reason,
            Some(RejectionReason::UncertainViolation)
        );
    }

    #[test]
    fn test_normalized_non_vehicle_gets_reason_and_zero_points() {
        let verdict = ViolationVerdict {
            is_vehicle: false,
            ..accepted(15, 99)
        }
        .normalized();
        assert_eq!(verdict.points, 0);
        assert_eq!(verdict.rejection_reason, Some(RejectionReason::NotAVehicle));
    }

    #[test]
    fn test_normalized_keeps_existing_reason() {
        let verdict = ViolationVerdict {
            is_vehicle: false,
            rejection_reason: Some(RejectionReason::LowQuality),
            ..accepted(5, 99)
        }
        .normalized();
        assert_eq!(verdict.rejection_reason, Some(RejectionReason::LowQuality));
    }
}
