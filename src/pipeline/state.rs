use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::i18n::TextKey;

/// 一次拍照到草稿的处理阶段，严格按顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineStage {
    Idle,
    Detecting,
    Redacting,
    Analyzing,
    Review,
}

impl PipelineStage {
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            PipelineStage::Detecting | PipelineStage::Redacting | PipelineStage::Analyzing
        )
    }

    /// 处理中显示的状态文案
    pub fn status_text(self) -> Option<TextKey> {
        match self {
            PipelineStage::Idle => None,
            PipelineStage::Detecting => Some(TextKey::Scanning),
            PipelineStage::Redacting => Some(TextKey::Shielding),
            PipelineStage::Analyzing => Some(TextKey::Scanning),
            PipelineStage::Review => Some(TextKey::IdiotLogged),
        }
    }
}

/// 每次处理发放的令牌，结果回来时用它判断是否已过期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// 单调递增的代数，发放新令牌或取消都会让旧令牌失效
#[derive(Debug, Default)]
pub struct TokenIssuer {
    generation: AtomicU64,
}

impl TokenIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_stages_and_status_text() {
        assert!(!PipelineStage::Idle.is_busy());
        assert!(!PipelineStage::Review.is_busy());
        assert_eq!(PipelineStage::Idle.status_text(), None);
        assert_eq!(PipelineStage::Redacting.status_text(), Some(TextKey::Shielding));
        assert!(PipelineStage::Redacting.is_busy());
    }

    #[test]
    fn test_newer_token_supersedes_older() {
        let issuer = TokenIssuer::new();
        let first = issuer.issue();
        assert!(issuer.is_current(first));

        let second = issuer.issue();
        assert!(!issuer.is_current(first));
        assert!(issuer.is_current(second));
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_invalidate_expires_current_token() {
        let issuer = TokenIssuer::new();
        let token = issuer.issue();
        issuer.invalidate();
        assert!(!issuer.is_current(token));
    }
}
