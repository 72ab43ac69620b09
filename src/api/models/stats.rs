use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "AGENT_ZERO";

/// 设备上唯一的用户统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub username: String,
    pub total_points: u32,
    pub level: u8,
    pub reports_count: u32,
    /// 当日已获得的分数，按 `last_active_date` 惰性清零
    #[serde(default)]
    pub daily_points: u32,
    pub last_active_date: NaiveDate,
    pub language: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl UserStats {
    /// 新用户入驻。用户名统一大写，空白时使用默认代号
    pub fn onboard(username: &str, language: &str, today: NaiveDate) -> Self {
        let trimmed = username.trim();
        let username = if trimmed.is_empty() {
            DEFAULT_USERNAME.to_string()
        } else {
            trimmed.to_uppercase()
        };

        Self {
            username,
            total_points: 0,
            level: 1,
            reports_count: 0,
            daily_points: 0,
            last_active_date: today,
            language: language.to_string(),
            profile_picture: None,
        }
    }
}
