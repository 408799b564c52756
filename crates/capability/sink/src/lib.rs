//! # 事件投递能力模块
//!
//! 生成的 [`EventData`] 通过 [`EventSink`] 送出：
//! - **MemorySink**：收集到内存（测试、演练）
//! - **StdoutSink**：每条事件输出一行 JSON
//! - **MqttSink**：MQTT v5 发布，应用属性映射为 user properties

mod memory;
mod mqtt;
mod stdout;

pub use memory::MemorySink;
pub use mqtt::{MqttSink, MqttSinkConfig, event_topic, user_properties};
pub use stdout::{StdoutSink, render_line};

use async_trait::async_trait;
use domain::EventData;
use evgen_telemetry::{record_event_sent, record_send_failure};
use tracing::warn;

/// 投递错误。
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("serialize error: {0}")]
    Serialize(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("publish error: {0}")]
    Publish(String),
    #[error("sink error: {0}")]
    Other(String),
}

/// 一批事件的投递结果。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sent: usize,
    pub failed: usize,
}

/// 事件投递目标抽象。
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, event: &EventData) -> Result<(), SinkError>;

    /// 逐条投递；单条失败记录后继续。
    async fn send_batch(&self, events: &[EventData]) -> BatchReport {
        let mut report = BatchReport::default();
        for event in events {
            match self.send(event).await {
                Ok(()) => {
                    record_event_sent();
                    report.sent += 1;
                }
                Err(err) => {
                    record_send_failure();
                    report.failed += 1;
                    warn!(
                        target: "evgen.sink",
                        partition_key = %event.partition_key,
                        error = %err,
                        "event_send_failed"
                    );
                }
            }
        }
        report
    }

    /// 释放连接并等待已排队的事件送出。
    async fn close(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
