//! 合成设备事件生成器：按配置生成一批事件并投递到目标 sink。

use evgen_config::{AppConfig, MqttConfig, SinkKind};
use evgen_generator::{EventDataGenerator, build_generator};
use evgen_sink::{EventSink, MqttSink, MqttSinkConfig, StdoutSink};
use evgen_telemetry::{init_tracing, metrics, new_batch_id};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{Instrument, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let generator = build_generator(&config.generator)?;
    let sink = build_sink(&config);

    let batch_id = new_batch_id();
    let span = tracing::info_span!(
        "batch",
        batch_id = %batch_id,
        generator = generator.name(),
        format = %config.generator.message_format
    );
    run_batch(generator.as_ref(), sink.as_ref(), &config)
        .instrument(span)
        .await?;

    let snapshot = metrics().snapshot();
    info!(
        target: "evgen.app",
        batch_id = %batch_id,
        events_generated = snapshot.events_generated,
        events_failed = snapshot.events_failed,
        events_sent = snapshot.events_sent,
        send_failures = snapshot.send_failures,
        "batch_finished"
    );
    Ok(())
}

async fn run_batch(
    generator: &dyn EventDataGenerator,
    sink: &dyn EventSink,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // 指定种子时可复现同一批负载
    let events = match config.seed {
        Some(seed) => generator.generate_with_rng(config.count, &mut StdRng::seed_from_u64(seed))?,
        None => generator.generate_event_data_collection(config.count)?,
    };
    let report = sink.send_batch(&events).await;
    info!(
        target: "evgen.app",
        sent = report.sent,
        failed = report.failed,
        "batch_sent"
    );
    sink.close().await?;
    Ok(())
}

fn build_sink(config: &AppConfig) -> Box<dyn EventSink> {
    match config.sink {
        SinkKind::Stdout => Box::new(StdoutSink),
        SinkKind::Mqtt => Box::new(MqttSink::connect(mqtt_sink_config(
            &config.mqtt,
            config.generator.message_format,
        ))),
    }
}

fn mqtt_sink_config(mqtt: &MqttConfig, format: domain::MessageFormat) -> MqttSinkConfig {
    MqttSinkConfig {
        host: mqtt.host.clone(),
        port: mqtt.port,
        username: mqtt.username.clone(),
        password: mqtt.password.clone(),
        topic_prefix: mqtt.topic_prefix.clone(),
        qos: mqtt.qos,
        content_type: Some(format.content_type().to_string()),
        publish_timeout: Duration::from_millis(mqtt.publish_timeout_ms),
    }
}
