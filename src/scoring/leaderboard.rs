use serde::Serialize;

use super::level::Level;
use super::ScoringError;
use crate::api::models::UserStats;

/// 排行榜上固定的对手
pub const RIVALS: [(&str, u32); 3] = [
    ("ROAD_RAGE_99", 15_400),
    ("CURB_CRUSHER", 12_200),
    ("TOW_ZONE_TERRY", 10_100),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub name: String,
    pub xp: u32,
    pub level: u8,
    pub level_name: String,
    pub is_self: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reward {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
}

pub const REWARDS: [Reward; 8] = [
    Reward { id: "coffee", name: "€5 COFFEE CARD", cost: 1500 },
    Reward { id: "spotify", name: "SPOTIFY MONTH", cost: 3000 },
    Reward { id: "uber", name: "€20 UBER CASH", cost: 5500 },
    Reward { id: "amazon25", name: "€25 AMAZON CARD", cost: 7000 },
    Reward { id: "netflix", name: "€50 NETFLIX CARD", cost: 12_000 },
    Reward { id: "steam", name: "€50 STEAM CARD", cost: 12_000 },
    Reward { id: "merch", name: "OFFICIAL MERCH", cost: 15_000 },
    Reward { id: "apple", name: "€100 APP STORE", cost: 25_000 },
];

/// 对手加上当前用户，按 XP 降序排名（并列时对手在前）
pub fn standings(stats: Option<&UserStats>, self_label: &str) -> Vec<Standing> {
    let mut entries: Vec<(String, u32, u8, bool)> = RIVALS
        .iter()
        .map(|(name, xp)| (name.to_string(), *xp, Level::from_points(*xp).number(), false))
        .collect();

    let (name, xp, level) = match stats {
        Some(s) => (s.username.clone(), s.total_points, s.level),
        None => (self_label.to_string(), 0, Level::Observer.number()),
    };
    entries.push((name, xp, level, true));

    // sort_by 是稳定排序
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, xp, level, is_self))| Standing {
            rank: i as u32 + 1,
            name,
            xp,
            level,
            level_name: Level::from_number(level).name().to_string(),
            is_self,
        })
        .collect()
}

pub fn can_afford(stats: &UserStats, reward: &Reward) -> bool {
    stats.total_points >= reward.cost
}

/// 兑换奖励（模拟）：只检查积分是否足够，不扣分
pub fn claim_reward(stats: &UserStats, reward_id: &str) -> Result<Reward, ScoringError> {
    let reward = REWARDS
        .iter()
        .find(|r| r.id == reward_id)
        .ok_or_else(|| ScoringError::UnknownReward(reward_id.to_string()))?;

    if !can_afford(stats, reward) {
        return Err(ScoringError::InsufficientPoints {
            needed: reward.cost,
            available: stats.total_points,
        });
    }
    Ok(*reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stats(total: u32) -> UserStats {
        let mut s = UserStats::onboard(
            "hunter",
            "en",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        s.total_points = total;
        s.level = Level::from_points(total).number();
        s
    }

    #[test]
    fn test_new_user_ranks_last() {
        let s = stats(40);
        let board = standings(Some(&s), "YOU");
        assert_eq!(board.len(), 4);
        assert_eq!(board[0].name, "ROAD_RAGE_99");
        assert_eq!(board[3].name, "HUNTER");
        assert_eq!(board[3].rank, 4);
        assert!(board[3].is_self);
        assert_eq!(board[3].level_name, "Observer");
        assert_eq!(board[0].level_name, "Enforcer");
    }

    #[test]
    fn test_user_can_climb_to_top() {
        let s = stats(20_000);
        let board = standings(Some(&s), "YOU");
        assert_eq!(board[0].name, "HUNTER");
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_signed_out_uses_label() {
        let board = standings(None, "VOCÊ");
        let me = board.iter().find(|s| s.is_self).unwrap();
        assert_eq!(me.name, "VOCÊ");
        assert_eq!(me.xp, 0);
    }

    #[test]
    fn test_claim_reward_checks_balance_only() {
        let rich = stats(3000);
        let reward = claim_reward(&rich, "spotify").unwrap();
        assert_eq!(reward.cost, 3000);

        let poor = stats(1499);
        assert!(matches!(
            claim_reward(&poor, "coffee"),
            Err(ScoringError::InsufficientPoints { needed: 1500, available: 1499 })
        ));
        assert!(matches!(
            claim_reward(&rich, "yacht"),
            Err(ScoringError::UnknownReward(_))
        ));
    }
}
