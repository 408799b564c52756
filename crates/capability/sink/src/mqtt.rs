use crate::{EventSink, SinkError};
use domain::EventData;
use rumqttc::v5::mqttbytes::QoS;
use rumqttc::v5::mqttbytes::v5::PublishProperties;
use rumqttc::v5::{AsyncClient, MqttOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 关闭时等待事件循环刷出的最长时间。
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// MQTT 投递配置。
#[derive(Debug, Clone)]
pub struct MqttSinkConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// 事件 topic 前缀：`{prefix}/{partition_key}`。
    pub topic_prefix: String,
    pub qos: u8,
    pub content_type: Option<String>,
    /// 单条发布（含请求队列已满时的等待）的最长时间。
    pub publish_timeout: Duration,
}

/// MQTT v5 投递实现。
pub struct MqttSink {
    client: AsyncClient,
    topic_prefix: String,
    qos: QoS,
    content_type: Option<String>,
    publish_timeout: Duration,
    closing: Arc<AtomicBool>,
    eventloop: Mutex<Option<JoinHandle<()>>>,
}

impl MqttSink {
    /// 建立客户端并在后台驱动事件循环（需在 tokio 运行时内调用）。
    pub fn connect(config: MqttSinkConfig) -> Self {
        let client_id = format!("evgen-{}", uuid::Uuid::new_v4());
        let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (config.username, config.password) {
            options.set_credentials(username, password);
        }
        let (client, mut eventloop) = AsyncClient::new(options, 64);
        let closing = Arc::new(AtomicBool::new(false));
        let loop_closing = closing.clone();
        let handle = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(event) => debug!(target: "evgen.sink", ?event, "mqtt_event"),
                    Err(err) => {
                        if loop_closing.load(Ordering::Relaxed) {
                            break;
                        }
                        warn!(target: "evgen.sink", "mqtt sink eventloop error: {}", err);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });
        info!(
            target: "evgen.sink",
            host = %config.host,
            port = config.port,
            topic_prefix = %config.topic_prefix,
            "mqtt_sink_started"
        );
        Self {
            client,
            topic_prefix: config.topic_prefix,
            qos: qos_from_u8(config.qos),
            content_type: config.content_type,
            publish_timeout: config.publish_timeout,
            closing,
            eventloop: Mutex::new(Some(handle)),
        }
    }
}

#[async_trait::async_trait]
impl EventSink for MqttSink {
    async fn send(&self, event: &EventData) -> Result<(), SinkError> {
        let topic = event_topic(&self.topic_prefix, &event.partition_key);
        let properties = PublishProperties {
            content_type: self.content_type.clone(),
            user_properties: user_properties(event),
            ..Default::default()
        };
        debug!(
            target: "evgen.sink",
            topic = %topic,
            payload_size = event.body.len(),
            "event_publish"
        );
        // broker 不可达时请求队列会被占满，publish 将一直挂起
        let publish =
            self.client
                .publish_with_properties(topic, self.qos, false, event.body.clone(), properties);
        match tokio::time::timeout(self.publish_timeout, publish).await {
            Ok(result) => result.map_err(|err| SinkError::Publish(err.to_string())),
            Err(_) => Err(SinkError::Publish(format!(
                "publish timed out after {:?}",
                self.publish_timeout
            ))),
        }
    }

    async fn close(&self) -> Result<(), SinkError> {
        self.closing.store(true, Ordering::Relaxed);
        match tokio::time::timeout(CLOSE_TIMEOUT, self.client.disconnect()).await {
            Ok(result) => result.map_err(|err| SinkError::Publish(err.to_string()))?,
            Err(_) => warn!(target: "evgen.sink", "mqtt sink disconnect timed out"),
        }
        let handle = self
            .eventloop
            .lock()
            .map_err(|_| SinkError::Other("lock failed".to_string()))?
            .take();
        if let Some(mut handle) = handle {
            if tokio::time::timeout(CLOSE_TIMEOUT, &mut handle).await.is_err() {
                warn!(target: "evgen.sink", "mqtt sink close timed out");
                handle.abort();
            }
        }
        Ok(())
    }
}

/// 事件 topic：`{prefix}/{partition_key}`。
pub fn event_topic(prefix: &str, partition_key: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        partition_key.to_string()
    } else {
        format!("{}/{}", prefix, partition_key)
    }
}

/// 应用属性 → MQTT v5 user properties（按键名排序）。
pub fn user_properties(event: &EventData) -> Vec<(String, String)> {
    event
        .properties
        .iter()
        .map(|(key, value)| (key.clone(), value.to_string()))
        .collect()
}

fn qos_from_u8(value: u8) -> QoS {
    match value {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        2 => QoS::ExactlyOnce,
        _ => QoS::AtMostOnce,
    }
}
