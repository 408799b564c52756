use crate::{EventSink, SinkError};
use domain::{EventData, PropertyValue};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StdoutRecord<'a> {
    partition_key: &'a str,
    properties: &'a BTreeMap<String, PropertyValue>,
    body: std::borrow::Cow<'a, str>,
}

/// 将事件渲染为单行 JSON（负载按文本输出）。
pub fn render_line(event: &EventData) -> Result<String, SinkError> {
    let record = StdoutRecord {
        partition_key: &event.partition_key,
        properties: &event.properties,
        body: String::from_utf8_lossy(&event.body),
    };
    serde_json::to_string(&record).map_err(|err| SinkError::Serialize(err.to_string()))
}

/// 标准输出投递（每条事件一行）。
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait::async_trait]
impl EventSink for StdoutSink {
    async fn send(&self, event: &EventData) -> Result<(), SinkError> {
        let line = render_line(event)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), SinkError> {
        std::io::stdout().flush()?;
        Ok(())
    }
}
