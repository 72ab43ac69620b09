//! 积分、等级、举报列表和排行榜
//!
//! 这里全是纯逻辑，不碰网络和存储，方便单独测试。

use thiserror::Error;

pub mod engine;
pub mod leaderboard;
pub mod level;
pub mod report_store;

pub use engine::{finalize, FinalizeOptions, Finalization, DAILY_POINT_CAP};
pub use leaderboard::{claim_reward, standings, Reward, Standing, REWARDS};
pub use level::{level_up, xp_to_next_level, Level};
pub use report_store::{ReportStore, MAX_STORED_REPORTS};

#[derive(Error, Debug, PartialEq)]
pub enum ScoringError {
    #[error("未知的奖励: {0}")]
    UnknownReward(String),
    #[error("积分不足: 需要 {needed}, 当前 {available}")]
    InsufficientPoints { needed: u32, available: u32 },
}
