//! 模拟设备事件负载。
//!
//! JSON 形如 `{"deviceid":5,"value":1}`，XML 根元素为 `event`，
//! 默认命名空间见 [`EVENT_NAMESPACE`]。开关值在两种格式下均编码为 0/1。

use serde::Serialize;
use std::str::FromStr;

/// XML 负载的默认命名空间。
pub const EVENT_NAMESPACE: &str = "http://schemas.microsoft.com/servicebusexplorer";

/// 开关状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnOff {
    #[default]
    Off,
    On,
}

impl OnOff {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(OnOff::Off),
            1 => Some(OnOff::On),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            OnOff::Off => 0,
            OnOff::On => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            OnOff::Off => OnOff::On,
            OnOff::On => OnOff::Off,
        }
    }
}

impl Serialize for OnOff {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

/// 负载序列化格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageFormat {
    #[default]
    Json,
    Xml,
}

impl MessageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageFormat::Json => "json",
            MessageFormat::Xml => "xml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MessageFormat::Json => "application/json",
            MessageFormat::Xml => "application/xml",
        }
    }
}

impl std::fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message format: {0}")]
pub struct ParseFormatError(pub String);

impl FromStr for MessageFormat {
    type Err = ParseFormatError;

    /// 接受名称（大小写不敏感）或序号 0/1。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" | "0" => Ok(MessageFormat::Json),
            "xml" | "1" => Ok(MessageFormat::Xml),
            _ => Err(ParseFormatError(value.to_string())),
        }
    }
}

/// 设备事件负载的公共视图，供编码与属性填充使用。
pub trait EventPayload: Serialize {
    fn device_id(&self) -> i32;
    /// 读数的整数表示（开关为 0/1）。
    fn reading(&self) -> i64;
}

/// 开关型设备事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnOffDeviceEvent {
    #[serde(rename = "deviceid")]
    pub device_id: i32,
    pub value: OnOff,
}

impl EventPayload for OnOffDeviceEvent {
    fn device_id(&self) -> i32 {
        self.device_id
    }

    fn reading(&self) -> i64 {
        i64::from(self.value.as_i32())
    }
}

/// 阈值型设备事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThresholdDeviceEvent {
    #[serde(rename = "deviceid")]
    pub device_id: i32,
    pub value: i32,
}

impl EventPayload for ThresholdDeviceEvent {
    fn device_id(&self) -> i32 {
        self.device_id
    }

    fn reading(&self) -> i64 {
        i64::from(self.value)
    }
}
