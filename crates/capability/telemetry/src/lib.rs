//! 追踪初始化、批次 ID 与基础计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub events_generated: u64,
    pub events_failed: u64,
    pub events_sent: u64,
    pub send_failures: u64,
}

/// 进程级计数器。
pub struct TelemetryMetrics {
    events_generated: AtomicU64,
    events_failed: AtomicU64,
    events_sent: AtomicU64,
    send_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            events_generated: AtomicU64::new(0),
            events_failed: AtomicU64::new(0),
            events_sent: AtomicU64::new(0),
            send_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_generated: self.events_generated.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            events_sent: self.events_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
///
/// 日志写到 stderr，stdout 只留给事件输出。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 生成新的批次 ID。
pub fn new_batch_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录成功生成的事件数。
pub fn record_events_generated(count: u64) {
    metrics().events_generated.fetch_add(count, Ordering::Relaxed);
}

/// 记录生成失败（被跳过）的事件。
pub fn record_event_failed() {
    metrics().events_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录投递成功次数。
pub fn record_event_sent() {
    metrics().events_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录投递失败次数。
pub fn record_send_failure() {
    metrics().send_failures.fetch_add(1, Ordering::Relaxed);
}
