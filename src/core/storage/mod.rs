//! 本地持久化：扁平的键值存储 + 带缓存的仓库

use std::sync::Arc;
use thiserror::Error;

pub mod file;
pub mod memory;
pub mod repository;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use repository::{AppRepository, Snapshot, REPORTS_KEY, USER_STATS_KEY};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("序列化失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("非法的存储键: {0}")]
    InvalidKey(String),
    #[error("存储锁被污染: {0}")]
    Poisoned(String),
}

/// 键不存在返回 `Ok(None)`，表示首次运行而不是错误
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
