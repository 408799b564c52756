use std::collections::BTreeMap;

/// 事件属性值的数据类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    I64(i64),
    String(String),
}

impl PropertyValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::I64(value) => Some(*value),
            PropertyValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::I64(_) => None,
            PropertyValue::String(value) => Some(value),
        }
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::I64(value) => write!(f, "{}", value),
            PropertyValue::String(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::I64(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::I64(i64::from(value))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl serde::Serialize for PropertyValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::I64(value) => serializer.serialize_i64(*value),
            PropertyValue::String(value) => serializer.serialize_str(value),
        }
    }
}

/// 发往 broker 的事件：已编码负载 + 分区键 + 应用属性。
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    pub body: Vec<u8>,
    pub partition_key: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl EventData {
    pub fn new(body: Vec<u8>, partition_key: impl Into<String>) -> Self {
        Self {
            body,
            partition_key: partition_key.into(),
            properties: BTreeMap::new(),
        }
    }

    /// 追加一个应用属性（同名覆盖）。
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// 负载按 UTF-8 解读（JSON/XML 负载均为文本）。
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}
