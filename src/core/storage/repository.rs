use std::sync::RwLock;

use log::{info, warn};
use serde::de::DeserializeOwned;

use super::{KeyValueStore, StorageError};
use crate::api::models::{Report, UserStats};
use crate::scoring::ReportStore;

pub const USER_STATS_KEY: &str = "userStats";
pub const REPORTS_KEY: &str = "reports";

/// 启动时加载的全部持久化状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// `None` 表示尚未完成引导
    pub stats: Option<UserStats>,
    pub reports: ReportStore,
}

/// 统计和举报列表的仓库
///
/// 底层存储只在 `load` 时读取一次，之后读缓存，写操作同时更新存储和缓存。
pub struct AppRepository<S: KeyValueStore> {
    store: S,
    cache: RwLock<Option<Snapshot>>,
}

impl<S: KeyValueStore> AppRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
        }
    }

    /// 从存储读取快照。损坏的记录按缺失处理，不阻止启动
    pub fn load(&self) -> Result<Snapshot, StorageError> {
        let stats: Option<UserStats> = self.read_json(USER_STATS_KEY)?;
        let reports: Vec<Report> = self.read_json(REPORTS_KEY)?.unwrap_or_default();
        let snapshot = Snapshot {
            stats,
            reports: ReportStore::from_reports(reports),
        };

        info!(
            "📦 Loaded snapshot: onboarded={} reports={}",
            snapshot.stats.is_some(),
            snapshot.reports.len()
        );

        *self.write_cache()? = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// 缓存的快照，首次调用时触发 `load`
    pub fn snapshot(&self) -> Result<Snapshot, StorageError> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|e| StorageError::Poisoned(e.to_string()))?;
            if let Some(snapshot) = cache.as_ref() {
                return Ok(snapshot.clone());
            }
        }
        self.load()
    }

    pub fn save_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        let json = serde_json::to_string(stats)?;
        self.store.set(USER_STATS_KEY, &json)?;
        let mut cache = self.write_cache()?;
        cache.get_or_insert_with(Snapshot::default).stats = Some(stats.clone());
        Ok(())
    }

    pub fn save_reports(&self, reports: &ReportStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(reports)?;
        self.store.set(REPORTS_KEY, &json)?;
        let mut cache = self.write_cache()?;
        cache.get_or_insert_with(Snapshot::default).reports = reports.clone();
        Ok(())
    }

    /// 退出登录：只清除统计，举报保留
    pub fn clear_stats(&self) -> Result<(), StorageError> {
        self.store.remove(USER_STATS_KEY)?;
        let mut cache = self.write_cache()?;
        if let Some(snapshot) = cache.as_mut() {
            snapshot.stats = None;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("⚠️ Discarding unreadable record '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    fn write_cache(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Option<Snapshot>>, StorageError> {
        self.cache
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))
    }
}
