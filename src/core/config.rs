use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::retry::RetryPolicy;

pub const API_KEY_ENV: &str = "PARKING_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("缺少配置项: {0}")]
    Missing(&'static str),
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    /// 检测和分析使用的视觉模型
    pub vision_model: String,
    /// 地点查询需要支持 Maps grounding 的模型
    pub maps_model: String,
    pub request_timeout_secs: u64,
    /// 打码强度 0-100
    pub redaction_intensity: u8,
    pub retry: RetryPolicy,
    /// 本地状态存放目录
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            vision_model: "gemini-3-flash-preview".to_string(),
            maps_model: "gemini-2.5-flash".to_string(),
            request_timeout_secs: 60,
            redaction_intensity: 100,
            retry: RetryPolicy::default(),
            data_dir: String::new(),
        }
    }
}

impl AppConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 环境变量中的 API key 优先于配置文件
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV)
            .or_else(|| lookup(FALLBACK_API_KEY_ENV))
            .filter(|k| !k.trim().is_empty());
        if let Some(key) = key {
            self.api_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Missing("data_dir"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = AppConfig::from_json_str(r#"{"api_key":"k","data_dir":"/tmp/p"}"#).unwrap();
        assert_eq!(config.vision_model, "gemini-3-flash-preview");
        assert_eq!(config.maps_model, "gemini-2.5-flash");
        assert_eq!(config.redaction_intensity, 100);
        assert_eq!(config.retry, RetryPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_retry_section() {
        let config =
            AppConfig::from_json_str(r#"{"retry":{"max_retries":1}}"#).unwrap();
        assert_eq!(config.retry.max_retries, 1);
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn test_env_override_prefers_primary_key() {
        let config = AppConfig::default().with_overrides_from(|name| match name {
            API_KEY_ENV => Some("primary".to_string()),
            FALLBACK_API_KEY_ENV => Some("fallback".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key, "primary");

        let config = AppConfig::default().with_overrides_from(|name| match name {
            FALLBACK_API_KEY_ENV => Some("fallback".to_string()),
            _ => None,
        });
        assert_eq!(config.api_key, "fallback");
    }

    #[test]
    fn test_validate_requires_key_and_dir() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("api_key"))));

        let config = AppConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing("data_dir"))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_key":"abc","request_timeout_secs":5}"#).unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.request_timeout_secs, 5);
    }
}
