//! 生成式模型的 HTTP 客户端（Gemini REST 接口）

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::core::config::AppConfig;
use crate::core::retry::RetryPolicy;

pub mod parser;
pub mod prompts;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("请求被限流 (429)")]
    RateLimited,
    #[error("模型服务返回异常状态 {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("模型返回内容为空")]
    EmptyResponse,
    #[error("JSON 数据解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeminiError {
    /// 只有限流错误值得重试
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GeminiError::RateLimited => true,
            GeminiError::UnexpectedStatus { body, .. } => body.contains("429"),
            _ => false,
        }
    }
}

/// 请求里携带的图片
pub struct InlineImage<'a> {
    pub mime_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> InlineImage<'a> {
    pub fn jpeg(data: &'a [u8]) -> Self {
        Self {
            mime_type: "image/jpeg",
            data,
        }
    }
}

/// 阻塞式模型客户端，所有远程调用共用
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, GeminiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        Self::new(
            config.api_base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
            config.retry.clone(),
        )
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// 调用 `generateContent`，限流时按重试策略退避
    pub fn generate_content(&self, model: &str, body: &Value) -> Result<Value, GeminiError> {
        self.retry
            .run(|| self.send_once(model, body), GeminiError::is_rate_limited)
    }

    /// 图片 + 文本提示，要求按 schema 返回 JSON
    pub fn generate_json(
        &self,
        model: &str,
        image: &InlineImage<'_>,
        prompt: &str,
        schema: Value,
    ) -> Result<Value, GeminiError> {
        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime_type,
                            "data": STANDARD.encode(image.data),
                        }
                    },
                    { "text": prompt }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });
        self.generate_content(model, &body)
    }

    fn send_once(&self, model: &str, body: &Value) -> Result<Value, GeminiError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        debug!("📡 POST {}", url);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            info!("🚦 Model {} rate limited", model);
            return Err(GeminiError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GeminiError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json::<Value>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        assert!(GeminiError::RateLimited.is_rate_limited());
        assert!(GeminiError::UnexpectedStatus {
            status: 503,
            body: "upstream said 429 RESOURCE_EXHAUSTED".to_string()
        }
        .is_rate_limited());
        assert!(!GeminiError::EmptyResponse.is_rate_limited());
        assert!(!GeminiError::UnexpectedStatus {
            status: 500,
            body: "internal".to_string()
        }
        .is_rate_limited());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = GeminiClient::new(
            "https://example.invalid/",
            "key",
            Duration::from_secs(1),
            RetryPolicy::no_retry(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://example.invalid");
    }

    #[test]
    fn test_connection_failure_is_http_error() {
        // 端口 9 (discard) 在本地一般没有监听，连接会被立即拒绝
        let client = GeminiClient::new(
            "http://127.0.0.1:9",
            "key",
            Duration::from_secs(2),
            RetryPolicy::default(),
        )
        .unwrap();
        let result = client.generate_content("model", &json!({}));
        assert!(matches!(result, Err(GeminiError::Http(_))));
    }
}
