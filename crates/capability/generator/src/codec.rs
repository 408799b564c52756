//! 负载编码：JSON（serde_json）/ XML（quick-xml）。

use crate::GeneratorError;
use domain::{EVENT_NAMESPACE, EventPayload, MessageFormat};
use serde::Serialize;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

#[derive(Serialize)]
#[serde(rename = "event")]
struct XmlEvent {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    deviceid: i32,
    value: i64,
}

/// 按消息格式编码负载。
pub fn encode_payload<P: EventPayload>(
    payload: &P,
    format: MessageFormat,
) -> Result<Vec<u8>, GeneratorError> {
    match format {
        MessageFormat::Json => {
            serde_json::to_vec(payload).map_err(|err| GeneratorError::Encode {
                format,
                source: Box::new(err),
            })
        }
        MessageFormat::Xml => {
            let event = XmlEvent {
                xmlns: EVENT_NAMESPACE,
                deviceid: payload.device_id(),
                value: payload.reading(),
            };
            let body = quick_xml::se::to_string(&event).map_err(|err| GeneratorError::Encode {
                format,
                source: Box::new(err),
            })?;
            Ok(format!("{}{}", XML_DECLARATION, body).into_bytes())
        }
    }
}
