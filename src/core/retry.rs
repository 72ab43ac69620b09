//! 指数退避重试
//!
//! 检测、分析、地点查询共用同一个重试原语，每个调用点传入自己的
//! 可重试判定（目前只有限流错误会被重试）。

use log::warn;
use serde::Deserialize;
use std::time::Duration;

/// 退避参数，可从配置的 `retry` 段读取
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// 首次失败后最多再尝试的次数
    pub max_retries: u32,
    /// 第一次重试前等待的毫秒数
    pub initial_delay_ms: u64,
    /// 每次失败后等待时间的倍数
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry as i32);
        let ms = (self.initial_delay_ms as f64 * factor).min(u64::MAX as f64);
        Duration::from_millis(ms as u64)
    }

    /// 执行 `op`，仅在 `is_retryable` 返回 true 时按退避间隔重试
    pub fn run<T, E, F, R>(&self, op: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        R: Fn(&E) -> bool,
    {
        self.run_with_sleep(op, is_retryable, std::thread::sleep)
    }

    /// 同 [`RetryPolicy::run`]，休眠函数可替换（测试中不真正等待）
    pub fn run_with_sleep<T, E, F, R, S>(
        &self,
        mut op: F,
        is_retryable: R,
        mut sleep: S,
    ) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        R: Fn(&E) -> bool,
        S: FnMut(Duration),
    {
        let mut retry = 0u32;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if retry < self.max_retries && is_retryable(&err) => {
                    let delay = self.delay_for(retry);
                    warn!(
                        "⏳ Retryable failure, attempt {} of {}, backing off {} ms",
                        retry + 1,
                        self.max_retries,
                        delay.as_millis()
                    );
                    sleep(delay);
                    retry += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
