/// 等级（四档），由累计分数决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Observer = 1,
    Spotter = 2,
    Inspector = 3,
    Enforcer = 4,
}

/// 升序阈值表：(等级, 所需最低分数)
pub const LEVEL_THRESHOLDS: [(Level, u32); 4] = [
    (Level::Observer, 0),
    (Level::Spotter, 100),
    (Level::Inspector, 500),
    (Level::Enforcer, 2000),
];

impl Level {
    pub fn from_points(total_points: u32) -> Self {
        LEVEL_THRESHOLDS
            .iter()
            .rev()
            .find(|(_, min)| total_points >= *min)
            .map(|(level, _)| *level)
            .unwrap_or(Level::Observer)
    }

    /// 持久化的数字等级，超出范围的按边界处理
    pub fn from_number(n: u8) -> Self {
        match n {
            0 | 1 => Level::Observer,
            2 => Level::Spotter,
            3 => Level::Inspector,
            _ => Level::Enforcer,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Observer => "Observer",
            Level::Spotter => "Spotter",
            Level::Inspector => "Inspector",
            Level::Enforcer => "Enforcer",
        }
    }

    pub fn min_points(self) -> u32 {
        LEVEL_THRESHOLDS
            .iter()
            .find(|(level, _)| *level == self)
            .map(|(_, min)| *min)
            .unwrap_or(0)
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::Observer => Some(Level::Spotter),
            Level::Spotter => Some(Level::Inspector),
            Level::Inspector => Some(Level::Enforcer),
            Level::Enforcer => None,
        }
    }
}

/// 距离下一级还差多少分，已满级返回 `None`
pub fn xp_to_next_level(total_points: u32) -> Option<u32> {
    Level::from_points(total_points)
        .next()
        .map(|next| next.min_points().saturating_sub(total_points))
}

/// 升级信号：只比较前后等级
pub fn level_up(before: Level, after: Level) -> Option<Level> {
    (after > before).then_some(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(Level::from_points(0), Level::Observer);
        assert_eq!(Level::from_points(99), Level::Observer);
        assert_eq!(Level::from_points(100), Level::Spotter);
        assert_eq!(Level::from_points(499), Level::Spotter);
        assert_eq!(Level::from_points(500), Level::Inspector);
        assert_eq!(Level::from_points(1999), Level::Inspector);
        assert_eq!(Level::from_points(2000), Level::Enforcer);
        assert_eq!(Level::from_points(u32::MAX), Level::Enforcer);
    }

    #[test]
    fn test_level_numbers_roundtrip() {
        for (level, _) in LEVEL_THRESHOLDS {
            assert_eq!(Level::from_number(level.number()), level);
        }
        assert_eq!(Level::from_number(0), Level::Observer);
        assert_eq!(Level::from_number(9), Level::Enforcer);
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0), Some(100));
        assert_eq!(xp_to_next_level(95), Some(5));
        assert_eq!(xp_to_next_level(100), Some(400));
        assert_eq!(xp_to_next_level(2500), None);
    }

    #[test]
    fn test_level_up_only_on_increase() {
        assert_eq!(
            level_up(Level::Observer, Level::Spotter),
            Some(Level::Spotter)
        );
        assert_eq!(level_up(Level::Spotter, Level::Spotter), None);
        assert_eq!(level_up(Level::Inspector, Level::Spotter), None);
    }
}
