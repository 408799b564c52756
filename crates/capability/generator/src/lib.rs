//! # 事件生成能力模块
//!
//! 两个可互换的生成器按配置随机构造设备事件：
//! - **OnOffGenerator**：开关状态，按告警占比输出告警态 / 正常态
//! - **ThresholdGenerator**：阈值读数，在 `[min_value, max_value]` 内均匀取值
//!
//! ```text
//! GeneratorConfig
//!       │
//!       ▼
//! build_generator ──► dyn EventDataGenerator
//!       │
//!       ▼
//! payload ──► codec (JSON / XML) ──► EventData { body, partition_key, properties }
//! ```
//!
//! 单条事件构造失败只记录日志并跳过，不中断整批生成。

mod codec;
mod on_off;
mod threshold;

pub use codec::{XML_DECLARATION, encode_payload};
pub use on_off::OnOffGenerator;
pub use threshold::ThresholdGenerator;

use domain::{EventData, EventPayload, MessageFormat};
use evgen_config::{ConfigError, GeneratorConfig, GeneratorKind};
use evgen_telemetry::{record_event_failed, record_events_generated};
use rand::RngCore;
use tracing::{info, warn};

/// 0001-01-01T00:00:00Z 到 Unix 纪元的 100ns 刻度数。
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// 生成错误。
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("event data count must be non-negative, got {0}")]
    NegativeCount(i64),
    #[error("invalid generator config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to encode payload as {format}")]
    Encode {
        format: MessageFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 事件生成器抽象。
pub trait EventDataGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// 使用调用方提供的随机源生成 `count` 条事件。
    fn generate_with_rng(
        &self,
        count: i64,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<EventData>, GeneratorError>;

    fn generate_event_data_collection(&self, count: i64) -> Result<Vec<EventData>, GeneratorError> {
        self.generate_with_rng(count, &mut rand::thread_rng())
    }
}

/// 按配置种类构造生成器（构造时校验配置）。
pub fn build_generator(
    config: &GeneratorConfig,
) -> Result<Box<dyn EventDataGenerator>, GeneratorError> {
    let generator: Box<dyn EventDataGenerator> = match config.kind {
        GeneratorKind::OnOff => Box::new(OnOffGenerator::new(config.clone())?),
        GeneratorKind::Threshold => Box::new(ThresholdGenerator::new(config.clone())?),
    };
    Ok(generator)
}

/// 当前 UTC 时间的 100ns 刻度（自 0001-01-01 起）。
pub fn utc_now_ticks() -> i64 {
    let since_epoch = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    UNIX_EPOCH_TICKS + (since_epoch.as_nanos() / 100) as i64
}

/// 批量生成的公共循环：单条失败记录后跳过。
pub(crate) fn generate_batch<F>(
    generator: &'static str,
    count: i64,
    mut make: F,
) -> Result<Vec<EventData>, GeneratorError>
where
    F: FnMut() -> Result<EventData, GeneratorError>,
{
    if count < 0 {
        return Err(GeneratorError::NegativeCount(count));
    }
    let mut list = Vec::with_capacity(initial_capacity(count));
    for _ in 0..count {
        match make() {
            Ok(event) => list.push(event),
            Err(err) => log_item_failure(generator, &err),
        }
    }
    record_events_generated(list.len() as u64);
    info!(
        target: "evgen.generator",
        generator,
        requested = count,
        created = list.len(),
        "[{}] {} objects have been successfully created.",
        generator,
        list.len()
    );
    Ok(list)
}

/// 预分配上限：count 来自外部输入，不按其直接分配。
const MAX_PREALLOCATED_EVENTS: i64 = 1024;

fn initial_capacity(count: i64) -> usize {
    count.clamp(0, MAX_PREALLOCATED_EVENTS) as usize
}

fn log_item_failure(generator: &'static str, err: &GeneratorError) {
    record_event_failed();
    warn!(target: "evgen.generator", generator, "Exception: {}", err);
    if let Some(source) = std::error::Error::source(err) {
        let message = source.to_string();
        if !message.trim().is_empty() {
            warn!(target: "evgen.generator", generator, "InnerException: {}", message);
        }
    }
}

/// 负载 → EventData：编码、分区键（设备 ID 十进制）、应用属性。
pub(crate) fn build_event_data<P: EventPayload>(
    payload: &P,
    config: &GeneratorConfig,
) -> Result<EventData, GeneratorError> {
    let body = encode_payload(payload, config.message_format)?;
    let device_id = payload.device_id();
    Ok(EventData::new(body, device_id.to_string())
        .with_property("deviceId", device_id)
        .with_property("value", payload.reading())
        .with_property("time", utc_now_ticks())
        .with_property("city", config.city.as_str())
        .with_property("country", config.country.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_count_is_rejected() {
        let result = generate_batch("Test", -1, || Ok(EventData::new(Vec::new(), "1")));
        assert!(matches!(result, Err(GeneratorError::NegativeCount(-1))));
    }

    #[test]
    fn failed_items_are_skipped() {
        let mut index = 0;
        let list = generate_batch("Test", 5, || {
            index += 1;
            if index % 2 == 0 {
                Err(GeneratorError::Encode {
                    format: MessageFormat::Xml,
                    source: "boom".into(),
                })
            } else {
                Ok(EventData::new(Vec::new(), index.to_string()))
            }
        })
        .expect("batch");
        let keys: Vec<_> = list.iter().map(|e| e.partition_key.as_str()).collect();
        assert_eq!(keys, vec!["1", "3", "5"]);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("lock failed"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn item_failure_logs_exception_and_inner_exception() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let list = tracing::subscriber::with_default(subscriber, || {
            generate_batch("Test", 1, || {
                Err(GeneratorError::Encode {
                    format: MessageFormat::Json,
                    source: "unexpected eof".into(),
                })
            })
        })
        .expect("batch");
        assert!(list.is_empty());

        let output = String::from_utf8(logs.0.lock().expect("lock").clone()).expect("utf8");
        assert!(
            output.contains("Exception: failed to encode payload as json"),
            "{}",
            output
        );
        assert!(output.contains("InnerException: unexpected eof"), "{}", output);
        assert!(output.contains("[Test] 0 objects have been successfully created."));
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        assert_eq!(initial_capacity(i64::MAX), 1024);
        assert_eq!(initial_capacity(10), 10);
        assert_eq!(initial_capacity(-3), 0);
        let list: Vec<EventData> = Vec::with_capacity(initial_capacity(i64::MAX));
        assert!(list.capacity() >= 1024);
    }

    #[test]
    fn ticks_are_after_unix_epoch() {
        assert!(utc_now_ticks() > UNIX_EPOCH_TICKS);
    }
}
