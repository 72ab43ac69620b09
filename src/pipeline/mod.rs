//! 拍照 → 检测 → 打码 → 分析 → 草稿
//!
//! 各阶段严格串行。每个阶段结束后检查请求令牌，
//! 令牌已过期（用户取消或开始了新的拍摄）就丢弃结果。

use chrono::Utc;
use log::{debug, info};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub mod state;

pub use state::{PipelineStage, RequestToken, TokenIssuer};

use crate::api::models::{DraftReport, GeoPoint};
use crate::core::analyzer::ViolationAnalyzer;
use crate::core::detector::RegionDetector;
use crate::redaction::Redactor;

/// 一次拍摄的输入
#[derive(Debug, Clone)]
pub struct CaptureInput {
    pub image_jpeg: Vec<u8>,
    pub author: String,
    /// 分析结果使用的语言代码
    pub language: String,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Draft(DraftReport),
    /// 令牌已过期，结果作废
    Discarded,
}

pub struct ViolationPipeline {
    detector: Arc<dyn RegionDetector>,
    analyzer: Arc<dyn ViolationAnalyzer>,
    redactor: Redactor,
    tokens: TokenIssuer,
    stage: Mutex<PipelineStage>,
}

impl ViolationPipeline {
    pub fn new(
        detector: Arc<dyn RegionDetector>,
        analyzer: Arc<dyn ViolationAnalyzer>,
        redactor: Redactor,
    ) -> Self {
        Self {
            detector,
            analyzer,
            redactor,
            tokens: TokenIssuer::new(),
            stage: Mutex::new(PipelineStage::Idle),
        }
    }

    /// 开始新的一次处理，之前发出的令牌全部失效
    pub fn begin(&self) -> RequestToken {
        let token = self.tokens.issue();
        debug!("🎫 Issued request token {}", token.generation());
        token
    }

    pub fn cancel(&self) {
        self.tokens.invalidate();
        self.set_stage(PipelineStage::Idle);
        info!("🛑 Capture cancelled");
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.tokens.is_current(token)
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
            .lock()
            .map(|s| *s)
            .unwrap_or(PipelineStage::Idle)
    }

    /// 草稿被发布或放弃后回到空闲
    pub fn reset(&self) {
        self.set_stage(PipelineStage::Idle);
    }

    pub fn run(&self, input: CaptureInput, token: RequestToken) -> PipelineOutcome {
        if !self.enter(PipelineStage::Detecting, token) {
            return PipelineOutcome::Discarded;
        }
        let regions = self.detector.detect(&input.image_jpeg);

        if !self.enter(PipelineStage::Redacting, token) {
            return PipelineOutcome::Discarded;
        }
        let redacted = self.redactor.redact(&input.image_jpeg, &regions);

        if !self.enter(PipelineStage::Analyzing, token) {
            return PipelineOutcome::Discarded;
        }
        let verdict = self.analyzer.analyze(&redacted.jpeg_data, &input.language);

        if !self.enter(PipelineStage::Review, token) {
            return PipelineOutcome::Discarded;
        }

        let draft = DraftReport {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            author: input.author,
            image_jpeg: redacted.jpeg_data,
            location: input.location,
            verdict,
            redacted_regions: redacted.redacted_regions,
        };
        info!(
            "📝 Draft {} ready: vehicle={} points={} regions={}",
            draft.id, draft.verdict.is_vehicle, draft.verdict.points, draft.redacted_regions
        );
        PipelineOutcome::Draft(draft)
    }

    /// 进入下一阶段；令牌过期时不改状态并返回 false
    fn enter(&self, stage: PipelineStage, token: RequestToken) -> bool {
        if !self.tokens.is_current(token) {
            debug!(
                "🗑️ Token {} is stale, dropping result before {:?}",
                token.generation(),
                stage
            );
            return false;
        }
        self.set_stage(stage);
        true
    }

    fn set_stage(&self, stage: PipelineStage) {
        if let Ok(mut current) = self.stage.lock() {
            *current = stage;
        }
    }
}
