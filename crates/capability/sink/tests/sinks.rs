use async_trait::async_trait;
use domain::EventData;
use evgen_sink::{
    BatchReport, EventSink, MemorySink, SinkError, render_line, user_properties,
};

fn sample_event(device_id: i32) -> EventData {
    EventData::new(
        format!(r#"{{"deviceid":{},"value":1}}"#, device_id).into_bytes(),
        device_id.to_string(),
    )
    .with_property("deviceId", device_id)
    .with_property("value", 1)
    .with_property("city", "Milan")
}

struct FlakySink;

#[async_trait]
impl EventSink for FlakySink {
    async fn send(&self, event: &EventData) -> Result<(), SinkError> {
        if event.partition_key == "2" {
            return Err(SinkError::Publish("broker unavailable".to_string()));
        }
        Ok(())
    }
}

#[tokio::test]
async fn memory_sink_collects_batch() {
    let sink = MemorySink::new();
    let events = vec![sample_event(1), sample_event(2)];
    let report = sink.send_batch(&events).await;

    assert_eq!(report, BatchReport { sent: 2, failed: 0 });
    assert_eq!(sink.len(), 2);
    assert_eq!(sink.events()[1].partition_key, "2");
    sink.close().await.expect("close");
}

#[tokio::test]
async fn batch_continues_after_failure() {
    let events = vec![sample_event(1), sample_event(2), sample_event(3)];
    let report = FlakySink.send_batch(&events).await;
    assert_eq!(report, BatchReport { sent: 2, failed: 1 });
}

#[test]
fn stdout_line_contains_key_properties_and_body() {
    let line = render_line(&sample_event(5)).expect("line");
    let value: serde_json::Value = serde_json::from_str(&line).expect("json");
    assert_eq!(value["partitionKey"], "5");
    assert_eq!(value["properties"]["deviceId"], 5);
    assert_eq!(value["properties"]["city"], "Milan");
    assert_eq!(value["body"], r#"{"deviceid":5,"value":1}"#);
}

#[test]
fn user_properties_render_as_strings() {
    let properties = user_properties(&sample_event(8));
    assert_eq!(
        properties,
        vec![
            ("city".to_string(), "Milan".to_string()),
            ("deviceId".to_string(), "8".to_string()),
            ("value".to_string(), "1".to_string()),
        ]
    );
}
