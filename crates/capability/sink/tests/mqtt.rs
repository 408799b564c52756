use domain::EventData;
use evgen_sink::{EventSink, MqttSink, MqttSinkConfig};
use std::time::Duration;

fn unreachable_broker() -> MqttSinkConfig {
    MqttSinkConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: None,
        password: None,
        topic_prefix: "evgen/events".to_string(),
        qos: 0,
        content_type: Some("application/json".to_string()),
        publish_timeout: Duration::from_millis(20),
    }
}

#[tokio::test]
async fn unreachable_broker_fails_events_instead_of_hanging() {
    let sink = MqttSink::connect(unreachable_broker());
    let events: Vec<EventData> = (0..100)
        .map(|device_id| EventData::new(b"{}".to_vec(), device_id.to_string()))
        .collect();

    let report = tokio::time::timeout(Duration::from_secs(10), sink.send_batch(&events))
        .await
        .expect("send_batch returns");
    assert_eq!(report.sent + report.failed, 100);
    assert!(report.failed > 0);

    tokio::time::timeout(Duration::from_secs(10), sink.close())
        .await
        .expect("close returns")
        .expect("close");
}
