//! 操作耗时日志
//!
//! GraphQL 请求和机器人更新都通过 `OperationTimer` 记录开始、结束和耗时，
//! 超过阈值的操作以 warn 级别输出。

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// 默认慢操作阈值
pub const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(500);

/// 操作计时器
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
    slow_threshold: Duration,
}

impl OperationTimer {
    pub fn start(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        debug!(operation = %operation, "Operation started");
        Self {
            operation,
            start_time: Instant::now(),
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = threshold;
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed() >= self.slow_threshold
    }

    /// 记录结束；`errors` 为失败数量
    pub fn finish(self, errors: usize) {
        let elapsed = self.elapsed();
        let slow = elapsed >= self.slow_threshold;

        if errors > 0 {
            warn!(
                operation = %self.operation,
                duration_ms = %elapsed.as_millis(),
                errors,
                "Operation finished with errors"
            );
        } else if slow {
            warn!(
                operation = %self.operation,
                duration_ms = %elapsed.as_millis(),
                threshold_ms = %self.slow_threshold.as_millis(),
                "Slow operation"
            );
        } else {
            info!(
                operation = %self.operation,
                duration_ms = %elapsed.as_millis(),
                "Operation completed"
            );
        }
    }
}

/// 初始化测试日志（重复调用无副作用）
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booking_backend=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
