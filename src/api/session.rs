//! 会话句柄：宿主 App 通过它驱动整个拍照 → 发布流程

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{NaiveDate, Utc};
use flutter_rust_bridge::frb;
use log::info;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::{ParkingApiError, SessionError};
use super::models::{DraftReport, GeoPoint, NextView, Report, UserStats, Venue};
use crate::core::analyzer::{GeminiViolationAnalyzer, ViolationAnalyzer};
use crate::core::capture::{self, CaptureFailure, CaptureFailureKind, RawFrame};
use crate::core::config::AppConfig;
use crate::core::detector::{GeminiRegionDetector, RegionDetector};
use crate::core::gemini::GeminiClient;
use crate::core::i18n::{self, Locale, TextKey};
use crate::core::storage::{AppRepository, FileKeyValueStore, KeyValueStore};
use crate::core::venues::VenueLookup;
use crate::pipeline::{CaptureInput, PipelineOutcome, PipelineStage, ViolationPipeline};
use crate::redaction::Redactor;
use crate::scoring::{
    self, leaderboard, xp_to_next_level, FinalizeOptions, Level, Standing, DAILY_POINT_CAP,
};

/// 一次拍摄的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Draft(DraftReport),
    /// 处理期间被取消或被新的拍摄取代
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpNotice {
    pub level: u8,
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub report: Report,
    pub stats: UserStats,
    pub credited_points: u32,
    pub level_up: Option<LevelUpNotice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u8,
    pub level_name: String,
    pub total_points: u32,
    /// 满级时为空
    pub xp_to_next: Option<u32>,
    pub daily_points: u32,
    pub daily_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardInfo {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub can_afford: bool,
}

/// 语言选择器的一项
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

/// 会话句柄
///
/// ```dart
/// final session = await ParkingSession.create(configJson: json);
/// final outcome = await session.processCapture(imageJpeg: bytes);
/// final result = await session.finalizePending(options: opts);
/// ```
#[frb(opaque)]
pub struct ParkingSession {
    config: AppConfig,
    repository: AppRepository<Arc<dyn KeyValueStore>>,
    pipeline: ViolationPipeline,
    venues: VenueLookup,
    /// 同时充当发布操作的互斥锁
    pending: Mutex<Option<DraftReport>>,
}

impl ParkingSession {
    /// 读取配置、打开本地存储并加载快照
    #[frb]
    pub fn create(config_json: String) -> Result<ParkingSession, ParkingApiError> {
        crate::init_logging();
        let config = AppConfig::from_json_str(&config_json)?.with_env_overrides();
        config.validate()?;

        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(&config.data_dir)?);
        let client = GeminiClient::from_config(&config).map_err(SessionError::from)?;
        let detector = Arc::new(GeminiRegionDetector::new(
            client.clone(),
            config.vision_model.clone(),
        ));
        let analyzer = Arc::new(GeminiViolationAnalyzer::new(
            client,
            config.vision_model.clone(),
        ));

        Ok(Self::from_parts(config, store, detector, analyzer)?)
    }

    /// 用指定的存储和模型适配器组装会话
    #[frb(ignore)]
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        detector: Arc<dyn RegionDetector>,
        analyzer: Arc<dyn ViolationAnalyzer>,
    ) -> Result<ParkingSession, SessionError> {
        let venues = VenueLookup::new(GeminiClient::from_config(&config)?, config.maps_model.clone());
        let pipeline = ViolationPipeline::new(
            detector,
            analyzer,
            Redactor::new(config.redaction_intensity),
        );
        let repository = AppRepository::new(store);
        repository.load()?;

        info!("🚔 ParkingSession: created");
        Ok(Self {
            config,
            repository,
            pipeline,
            venues,
            pending: Mutex::new(None),
        })
    }

    #[frb(sync, getter)]
    pub fn stats(&self) -> Result<Option<UserStats>, ParkingApiError> {
        Ok(self.repository.snapshot()?.stats)
    }

    /// 最近的举报，新的在前
    #[frb(sync, getter)]
    pub fn reports(&self) -> Result<Vec<Report>, ParkingApiError> {
        Ok(self.repository.snapshot()?.reports.reports().to_vec())
    }

    #[frb(sync)]
    pub fn onboard(&self, username: String, language: String) -> Result<UserStats, ParkingApiError> {
        let language = canonical_language(&language)?;
        let stats = UserStats::onboard(&username, &language, today());
        self.repository.save_stats(&stats)?;
        info!("🪪 Onboarded {}", stats.username);
        Ok(stats)
    }

    /// 处理一张已经编码好的照片
    #[frb]
    pub fn process_capture(
        &self,
        image_jpeg: Vec<u8>,
        location: Option<GeoPoint>,
    ) -> Result<CaptureOutcome, ParkingApiError> {
        Ok(self.run_capture(image_jpeg, location)?)
    }

    /// 处理相机原始帧：裁成正方形后走同样的流程
    #[frb]
    pub fn process_frame(
        &self,
        frame: RawFrame,
        zoom: f32,
        location: Option<GeoPoint>,
    ) -> Result<CaptureOutcome, ParkingApiError> {
        let jpeg = capture::capture_square_jpeg(&frame, zoom).map_err(SessionError::from)?;
        Ok(self.run_capture(jpeg, location)?)
    }

    /// 取消进行中的处理，并丢弃未发布的草稿
    #[frb(sync)]
    pub fn cancel_capture(&self) -> Result<(), ParkingApiError> {
        self.pipeline.cancel();
        *self.pending()? = None;
        Ok(())
    }

    #[frb(sync, getter)]
    pub fn pending_draft(&self) -> Result<Option<DraftReport>, ParkingApiError> {
        Ok(self.pending()?.clone())
    }

    #[frb(sync, getter)]
    pub fn stage(&self) -> PipelineStage {
        self.pipeline.stage()
    }

    /// 当前阶段对应的状态文案
    #[frb(sync)]
    pub fn stage_text(&self) -> Result<Option<String>, ParkingApiError> {
        let language = self.language()?;
        Ok(self
            .stage()
            .status_text()
            .map(|key| i18n::text(&language, key).to_string()))
    }

    /// 发布待处理的草稿，并把结果写回本地
    #[frb(sync)]
    pub fn finalize_pending(&self, options: FinalizeOptions) -> Result<PublishResult, ParkingApiError> {
        Ok(self.publish(options, today())?)
    }

    /// 关闭结果页：被拒绝的草稿回到相机重拍，其余回首页
    #[frb(sync)]
    pub fn close_result(&self) -> Result<NextView, ParkingApiError> {
        let draft = self.pending()?.take();
        self.pipeline.reset();
        let next = match draft {
            Some(d) if d.is_rejected() => NextView::Camera,
            _ => NextView::Home,
        };
        info!("↩️ Result closed → {:?}", next);
        Ok(next)
    }

    #[frb]
    pub fn search_venues(
        &self,
        location: Option<GeoPoint>,
        query: Option<String>,
    ) -> Vec<Venue> {
        self.venues.search(location, query.as_deref())
    }

    #[frb(sync)]
    pub fn set_language(&self, language: String) -> Result<UserStats, ParkingApiError> {
        let language = canonical_language(&language)?;
        Ok(self.update_stats(|stats| stats.language = language)?)
    }

    /// `None` 清除头像
    #[frb(sync)]
    pub fn set_profile_picture(&self, picture: Option<String>) -> Result<UserStats, ParkingApiError> {
        Ok(self.update_stats(|stats| stats.profile_picture = picture)?)
    }

    /// 用相机帧设置头像，保存为 JPEG data URL
    #[frb]
    pub fn capture_profile_picture(
        &self,
        frame: RawFrame,
        zoom: f32,
    ) -> Result<UserStats, ParkingApiError> {
        let jpeg = capture::capture_square_jpeg(&frame, zoom).map_err(SessionError::from)?;
        let data_url = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg));
        self.set_profile_picture(Some(data_url))
    }

    /// 退出登录：清除统计，保留举报
    #[frb(sync)]
    pub fn sign_out(&self) -> Result<(), ParkingApiError> {
        self.cancel_capture()?;
        self.repository.clear_stats()?;
        info!("👋 Signed out");
        Ok(())
    }

    #[frb(sync, getter)]
    pub fn progress(&self) -> Result<Option<LevelProgress>, ParkingApiError> {
        let today = today();
        Ok(self.repository.snapshot()?.stats.map(|s| {
            let level = Level::from_points(s.total_points);
            LevelProgress {
                level: level.number(),
                level_name: level.name().to_string(),
                total_points: s.total_points,
                xp_to_next: xp_to_next_level(s.total_points),
                // 跨天后还没发布过，显示为 0
                daily_points: if s.last_active_date == today {
                    s.daily_points
                } else {
                    0
                },
                daily_cap: DAILY_POINT_CAP,
            }
        }))
    }

    #[frb(sync)]
    pub fn leaderboard(&self) -> Result<Vec<Standing>, ParkingApiError> {
        let stats = self.repository.snapshot()?.stats;
        let you = i18n::text(&self.language()?, TextKey::You);
        Ok(leaderboard::standings(stats.as_ref(), you))
    }

    #[frb(sync)]
    pub fn rewards(&self) -> Result<Vec<RewardInfo>, ParkingApiError> {
        let total = self
            .repository
            .snapshot()?
            .stats
            .map(|s| s.total_points)
            .unwrap_or(0);
        Ok(leaderboard::REWARDS
            .iter()
            .map(|r| RewardInfo {
                id: r.id.to_string(),
                name: r.name.to_string(),
                cost: r.cost,
                can_afford: total >= r.cost,
            })
            .collect())
    }

    /// 兑换只是模拟，不扣积分
    #[frb(sync)]
    pub fn claim_reward(&self, reward_id: String) -> Result<RewardInfo, ParkingApiError> {
        let stats = self.require_stats()?;
        let reward = leaderboard::claim_reward(&stats, &reward_id)?;
        info!("🎁 {} claimed {}", stats.username, reward.id);
        Ok(RewardInfo {
            id: reward.id.to_string(),
            name: reward.name.to_string(),
            cost: reward.cost,
            can_afford: true,
        })
    }

    /// 按键名取当前语言的文案，未知键名原样返回
    #[frb(sync)]
    pub fn text(&self, key: String) -> Result<String, ParkingApiError> {
        let language = self.language()?;
        Ok(TextKey::from_name(&key)
            .map(|k| i18n::text(&language, k).to_string())
            .unwrap_or(key))
    }

    /// 宿主上报相机不可用，返回提示和应退回的页面
    #[frb(sync)]
    pub fn capture_failure(
        &self,
        kind: CaptureFailureKind,
        for_profile: bool,
    ) -> Result<CaptureFailure, ParkingApiError> {
        Ok(CaptureFailure::new(kind, for_profile, &self.language()?))
    }

    #[frb(sync, getter)]
    pub fn supported_languages(&self) -> Vec<LanguageOption> {
        Locale::ALL
            .iter()
            .map(|l| LanguageOption {
                code: l.code().to_string(),
                name: l.display_name().to_string(),
            })
            .collect()
    }

    fn run_capture(
        &self,
        image_jpeg: Vec<u8>,
        location: Option<GeoPoint>,
    ) -> Result<CaptureOutcome, SessionError> {
        let stats = self.require_stats()?;
        let token = self.pipeline.begin();
        *self.pending()? = None;

        let input = CaptureInput {
            image_jpeg,
            author: stats.username,
            language: stats.language,
            location,
        };

        match self.pipeline.run(input, token) {
            PipelineOutcome::Draft(draft) => {
                let mut pending = self.pending()?;
                // 结果回来到这里之间也可能被取消
                if !self.pipeline.is_current(token) {
                    return Ok(CaptureOutcome::Discarded);
                }
                *pending = Some(draft.clone());
                Ok(CaptureOutcome::Draft(draft))
            }
            PipelineOutcome::Discarded => Ok(CaptureOutcome::Discarded),
        }
    }

    fn publish(&self, options: FinalizeOptions, today: NaiveDate) -> Result<PublishResult, SessionError> {
        let mut pending = self.pending()?;
        let stats = self.require_stats()?;
        let draft = pending.as_ref().ok_or(SessionError::NoPendingDraft)?;

        let anonymous = options.anonymous;
        let outcome = scoring::finalize(draft, &stats, options, today);

        // 先写积分：失败时什么都没落盘，草稿留着可以重试
        if !anonymous {
            self.repository.save_stats(&outcome.stats)?;
        }
        // 积分已入账，同一份草稿不能再发布
        *pending = None;
        self.pipeline.reset();

        let mut reports = self.repository.snapshot()?.reports;
        reports.push_front(outcome.report.clone());
        self.repository.save_reports(&reports)?;

        let level_up = outcome.level_up.map(|level| LevelUpNotice {
            level: level.number(),
            name: level.name().to_string(),
            message: i18n::text(&stats.language, TextKey::LevelUp).to_string(),
        });
        if let Some(notice) = &level_up {
            info!("🎉 Level up → {} ({})", notice.name, notice.level);
        }

        Ok(PublishResult {
            report: outcome.report,
            stats: outcome.stats,
            credited_points: outcome.credited_points,
            level_up,
        })
    }

    fn update_stats<F>(&self, change: F) -> Result<UserStats, SessionError>
    where
        F: FnOnce(&mut UserStats),
    {
        // 和发布共用同一把锁，避免覆盖刚写入的积分
        let _guard = self.pending()?;
        let mut stats = self.require_stats()?;
        change(&mut stats);
        self.repository.save_stats(&stats)?;
        Ok(stats)
    }

    fn require_stats(&self) -> Result<UserStats, SessionError> {
        self.repository
            .snapshot()?
            .stats
            .ok_or(SessionError::NotOnboarded)
    }

    /// 未引导时按英语
    fn language(&self) -> Result<String, SessionError> {
        Ok(self
            .repository
            .snapshot()?
            .stats
            .map(|s| s.language)
            .unwrap_or_else(|| Locale::En.code().to_string()))
    }

    fn pending(&self) -> Result<MutexGuard<'_, Option<DraftReport>>, SessionError> {
        self.pending.lock().map_err(|_| SessionError::Poisoned)
    }

    #[frb(ignore)]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Drop for ParkingSession {
    fn drop(&mut self) {
        info!("🗑️ ParkingSession: released");
    }
}

/// "today" 按 UTC 日期计算
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn canonical_language(code: &str) -> Result<String, SessionError> {
    Locale::from_code(code)
        .map(|l| l.code().to_string())
        .ok_or_else(|| SessionError::UnsupportedLanguage(code.to_string()))
}
