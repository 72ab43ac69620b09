use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::capture::CaptureError;
use crate::core::config::ConfigError;
use crate::core::gemini::GeminiError;
use crate::core::storage::StorageError;
use crate::scoring::ScoringError;

/// 会话层错误
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("尚未完成引导")]
    NotOnboarded,
    #[error("没有待发布的草稿")]
    NoPendingDraft,
    #[error("不支持的语言: {0}")]
    UnsupportedLanguage(String),
    #[error("会话锁被污染")]
    Poisoned,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] GeminiError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// 暴露给 Dart 的错误，FRB 友好的设计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingApiError {
    pub error_type: String,
    pub message: String,
}

impl ParkingApiError {
    fn new(error_type: &str, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParkingApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl std::error::Error for ParkingApiError {}

impl From<SessionError> for ParkingApiError {
    fn from(e: SessionError) -> Self {
        let error_type = match &e {
            SessionError::NotOnboarded => "NotOnboarded",
            SessionError::NoPendingDraft => "NoPendingDraft",
            SessionError::UnsupportedLanguage(_) => "UnsupportedLanguage",
            SessionError::Poisoned => "Internal",
            SessionError::Storage(_) => "Storage",
            SessionError::Config(_) => "Config",
            SessionError::Client(GeminiError::RateLimited) => "RateLimited",
            SessionError::Client(_) => "Network",
            SessionError::Capture(_) => "Capture",
            SessionError::Scoring(ScoringError::UnknownReward(_)) => "UnknownReward",
            SessionError::Scoring(ScoringError::InsufficientPoints { .. }) => "InsufficientPoints",
        };
        Self::new(error_type, e.to_string())
    }
}

impl From<StorageError> for ParkingApiError {
    fn from(e: StorageError) -> Self {
        SessionError::from(e).into()
    }
}

impl From<ConfigError> for ParkingApiError {
    fn from(e: ConfigError) -> Self {
        SessionError::from(e).into()
    }
}

impl From<ScoringError> for ParkingApiError {
    fn from(e: ScoringError) -> Self {
        SessionError::from(e).into()
    }
}
