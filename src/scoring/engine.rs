//! 积分与等级引擎
//!
//! 纯函数：输入草稿、当前统计和用户选项，输出发布的举报和新的统计。
//! 调用方负责把结果写回仓库。

use chrono::NaiveDate;
use log::info;

use super::level::{level_up, Level};
use crate::api::models::{DraftReport, Report, UserStats, Venue};

pub const DAILY_POINT_CAP: u32 = 200;
pub const ANONYMOUS_AUTHOR: &str = "ANON_VIGILANTE";
pub const FALLBACK_AUTHOR: &str = "Vigilante";

/// 发布时用户可编辑的内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizeOptions {
    pub anonymous: bool,
    /// 为空时保留模型生成的标题
    pub headline: Option<String>,
    pub caption: String,
    pub venue: Option<Venue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finalization {
    pub report: Report,
    /// 匿名时与输入完全相同
    pub stats: UserStats,
    pub credited_points: u32,
    pub level_up: Option<Level>,
}

/// 本次实际入账的分数：不超过当日剩余额度
pub fn credit_points(awarded: u32, daily_points: u32) -> u32 {
    awarded.min(DAILY_POINT_CAP.saturating_sub(daily_points))
}

pub fn finalize(
    draft: &DraftReport,
    stats: &UserStats,
    options: FinalizeOptions,
    today: NaiveDate,
) -> Finalization {
    let verdict = &draft.verdict;
    let awarded = if options.anonymous || !verdict.is_vehicle {
        0
    } else {
        verdict.points
    };

    let author = if options.anonymous {
        ANONYMOUS_AUTHOR.to_string()
    } else if stats.username.trim().is_empty() {
        FALLBACK_AUTHOR.to_string()
    } else {
        stats.username.clone()
    };

    let headline = options
        .headline
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| verdict.headline.clone());

    let report = Report {
        id: draft.id.clone(),
        timestamp: draft.timestamp,
        author,
        image_jpeg: draft.image_jpeg.clone(),
        headline,
        points: awarded,
        reasoning: verdict.reasoning.clone(),
        venue: options.venue,
        location: draft.location,
        user_message: options.caption,
        idiocy_score: verdict.idiocy_score,
        idiocy_category: verdict.idiocy_category.clone(),
        confidence: verdict.confidence,
        is_vehicle: verdict.is_vehicle,
        rejection_reason: verdict.rejection_reason,
    };

    // 匿名或被驳回的举报不计入统计
    if options.anonymous || !verdict.is_vehicle {
        info!(
            "🕶️ Report {} not credited (anonymous={}), stats untouched",
            report.id, options.anonymous
        );
        return Finalization {
            report,
            stats: stats.clone(),
            credited_points: 0,
            level_up: None,
        };
    }

    // 惰性日重置：跨天后第一次发布时清零
    let daily = if stats.last_active_date == today {
        stats.daily_points
    } else {
        0
    };
    let credited = credit_points(awarded, daily);

    let before = Level::from_number(stats.level);
    let total_points = stats.total_points.saturating_add(credited);
    let after = Level::from_points(total_points);

    let updated = UserStats {
        total_points,
        level: after.number(),
        reports_count: stats.reports_count + 1,
        daily_points: daily + credited,
        last_active_date: today,
        ..stats.clone()
    };

    info!(
        "🏅 Report {}: awarded {} credited {} (daily {}/{}) total {}",
        report.id, awarded, credited, updated.daily_points, DAILY_POINT_CAP, total_points
    );

    Finalization {
        report,
        stats: updated,
        credited_points: credited,
        level_up: level_up(before, after),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{RejectionReason, ViolationVerdict};
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    fn verdict(points: u32) -> ViolationVerdict {
        ViolationVerdict {
            headline: "Double Parking Detected".to_string(),
            points,
            reasoning: "Great catch! Evidence is clear.".to_string(),
            idiocy_score: 80,
            idiocy_category: "Double Parking".to_string(),
            is_vehicle: true,
            confidence: 95,
            rejection_reason: None,
        }
    }

    fn draft(verdict: ViolationVerdict) -> DraftReport {
        DraftReport {
            id: "draft-1".to_string(),
            timestamp: 1_767_000_000_000,
            author: "AGENT_X".to_string(),
            image_jpeg: vec![9, 9, 9],
            location: None,
            verdict,
            redacted_regions: 1,
        }
    }

    fn stats(total: u32, daily: u32, last: NaiveDate) -> UserStats {
        UserStats {
            username: "AGENT_X".to_string(),
            total_points: total,
            level: Level::from_points(total).number(),
            reports_count: 3,
            daily_points: daily,
            last_active_date: last,
            language: "en".to_string(),
            profile_picture: None,
        }
    }

    #[test]
    fn test_daily_cap_partial_credit() {
        let before = stats(300, 190, day(2));
        let result = finalize(&draft(verdict(50)), &before, FinalizeOptions::default(), day(2));

        assert_eq!(result.credited_points, 10);
        assert_eq!(result.stats.daily_points, 200);
        assert_eq!(result.stats.total_points, 310);
        assert_eq!(result.stats.reports_count, 4);
        // 举报本身记录的是判定给出的分数
        assert_eq!(result.report.points, 50);
    }

    #[test]
    fn test_cap_reached_credits_zero_but_counts_report() {
        let before = stats(300, 200, day(2));
        let result = finalize(&draft(verdict(25)), &before, FinalizeOptions::default(), day(2));
        assert_eq!(result.credited_points, 0);
        assert_eq!(result.stats.total_points, 300);
        assert_eq!(result.stats.reports_count, 4);
    }

    #[test]
    fn test_new_day_resets_daily_counter() {
        let before = stats(300, 200, day(1));
        let result = finalize(&draft(verdict(25)), &before, FinalizeOptions::default(), day(2));
        assert_eq!(result.credited_points, 25);
        assert_eq!(result.stats.daily_points, 25);
        assert_eq!(result.stats.last_active_date, day(2));
    }

    #[test]
    fn test_anonymous_leaves_stats_untouched() {
        let before = stats(300, 20, day(1));
        let options = FinalizeOptions {
            anonymous: true,
            caption: "look at this".to_string(),
            ..Default::default()
        };
        let result = finalize(&draft(verdict(80)), &before, options, day(2));

        assert_eq!(result.stats, before);
        assert_eq!(result.credited_points, 0);
        assert_eq!(result.level_up, None);
        assert_eq!(result.report.author, ANONYMOUS_AUTHOR);
        assert_eq!(result.report.points, 0);
        assert_eq!(result.report.user_message, "look at this");
    }

    #[test]
    fn test_level_up_fires_when_crossing_threshold() {
        let before = stats(95, 0, day(2));
        let result = finalize(&draft(verdict(10)), &before, FinalizeOptions::default(), day(2));
        assert_eq!(result.stats.total_points, 105);
        assert_eq!(result.level_up, Some(Level::Spotter));
        assert_eq!(result.stats.level, 2);

        let again = finalize(
            &draft(verdict(10)),
            &result.stats,
            FinalizeOptions::default(),
            day(2),
        );
        assert_eq!(again.level_up, None);
        assert_eq!(again.stats.level, 2);
    }

    #[test]
    fn test_rejected_verdict_credits_nothing() {
        let rejected = ViolationVerdict {
            is_vehicle: false,
            rejection_reason: Some(RejectionReason::LowQuality),
            ..verdict(20)
        };
        let before = stats(0, 0, day(1));
        let result = finalize(&draft(rejected), &before, FinalizeOptions::default(), day(2));
        assert_eq!(result.credited_points, 0);
        assert_eq!(result.report.points, 0);
        assert_eq!(result.report.author, "AGENT_X");
        assert_eq!(result.stats, before);
    }

    #[test]
    fn test_headline_edit_and_venue() {
        let venue = Venue {
            name: "Cafe A".to_string(),
            address: "Main St".to_string(),
            url: "https://maps.example/a".to_string(),
        };
        let options = FinalizeOptions {
            headline: Some("  Blocked my driveway  ".to_string()),
            venue: Some(venue.clone()),
            ..Default::default()
        };
        let result = finalize(&draft(verdict(5)), &stats(0, 0, day(2)), options, day(2));
        assert_eq!(result.report.headline, "Blocked my driveway");
        assert_eq!(result.report.venue, Some(venue));

        let blank = FinalizeOptions {
            headline: Some("   ".to_string()),
            ..Default::default()
        };
        let result = finalize(&draft(verdict(5)), &stats(0, 0, day(2)), blank, day(2));
        assert_eq!(result.report.headline, "Double Parking Detected");
    }

    #[test]
    fn test_blank_username_uses_fallback_author() {
        let mut before = stats(0, 0, day(2));
        before.username = " ".to_string();
        let result = finalize(&draft(verdict(5)), &before, FinalizeOptions::default(), day(2));
        assert_eq!(result.report.author, FALLBACK_AUTHOR);
    }

    proptest! {
        #[test]
        fn prop_rejected_verdicts_never_credit(
            points in 0u32..10_000,
            anonymous in any::<bool>(),
            total in 0u32..5000,
            daily in 0u32..=200,
        ) {
            let rejected = ViolationVerdict {
                is_vehicle: false,
                rejection_reason: Some(RejectionReason::NoViolation),
                ..verdict(points)
            };
            let before = stats(total, daily, day(2));
            let options = FinalizeOptions { anonymous, ..Default::default() };
            let result = finalize(&draft(rejected), &before, options, day(2));

            prop_assert_eq!(result.credited_points, 0);
            prop_assert_eq!(result.report.points, 0);
            prop_assert_eq!(result.stats.total_points, before.total_points);
            prop_assert_eq!(result.stats.reports_count, before.reports_count);
            prop_assert_eq!(result.level_up, None);
        }

        #[test]
        fn prop_same_day_credits_never_exceed_cap(
            awards in proptest::collection::vec((0u32..100_000, any::<bool>()), 1..40),
        ) {
            let mut current = stats(0, 0, day(3));
            let mut credited_today = 0u32;
            for (points, anonymous) in awards {
                let options = FinalizeOptions { anonymous, ..Default::default() };
                let result = finalize(&draft(verdict(points)), &current, options, day(3));
                credited_today += result.credited_points;
                current = result.stats;
                prop_assert!(current.daily_points <= DAILY_POINT_CAP);
            }
            prop_assert!(credited_today <= DAILY_POINT_CAP);
            prop_assert_eq!(current.total_points, credited_today);
        }

        #[test]
        fn prop_level_matches_threshold_table(start in 0u32..3000, points in 0u32..200) {
            let before = stats(start, 0, day(4));
            let result = finalize(&draft(verdict(points)), &before, FinalizeOptions::default(), day(4));
            let expected = Level::from_points(result.stats.total_points);
            prop_assert_eq!(result.stats.level, expected.number());
            let crossed = expected > Level::from_points(start);
            prop_assert_eq!(result.level_up.is_some(), crossed);
        }
    }
}
