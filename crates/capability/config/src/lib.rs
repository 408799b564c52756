//! 事件生成器运行配置加载。

use domain::{MessageFormat, OnOff};
use std::env;
use std::str::FromStr;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 生成器种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    OnOff,
    #[default]
    Threshold,
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "onoff" | "on_off" | "on-off" => Ok(GeneratorKind::OnOff),
            "threshold" => Ok(GeneratorKind::Threshold),
            _ => Err(value.to_string()),
        }
    }
}

/// 事件投递目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    #[default]
    Stdout,
    Mqtt,
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(SinkKind::Stdout),
            "mqtt" => Ok(SinkKind::Mqtt),
            _ => Err(value.to_string()),
        }
    }
}

/// 生成器参数（两种生成器共用）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub kind: GeneratorKind,
    pub min_device_id: i32,
    pub max_device_id: i32,
    pub min_value: i32,
    pub max_value: i32,
    /// 告警状态占比（0..=100），仅开关生成器使用。
    pub alert_percentage: i32,
    /// 告警状态（0 = Off，1 = On），仅开关生成器使用。
    pub alert_state: i32,
    pub message_format: MessageFormat,
    pub city: String,
    pub country: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            kind: GeneratorKind::default(),
            min_device_id: 1,
            max_device_id: 100,
            min_value: 1,
            max_value: 100,
            alert_percentage: 10,
            alert_state: OnOff::Off.as_i32(),
            message_format: MessageFormat::Json,
            city: "Milan".to_string(),
            country: "Italy".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// 校验取值范围；区间均为闭区间。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_device_id > self.max_device_id {
            return Err(ConfigError::Invalid(
                "min_device_id".to_string(),
                format!("{} > max_device_id {}", self.min_device_id, self.max_device_id),
            ));
        }
        if self.min_value > self.max_value {
            return Err(ConfigError::Invalid(
                "min_value".to_string(),
                format!("{} > max_value {}", self.min_value, self.max_value),
            ));
        }
        if !(0..=100).contains(&self.alert_percentage) {
            return Err(ConfigError::Invalid(
                "alert_percentage".to_string(),
                self.alert_percentage.to_string(),
            ));
        }
        self.alert_state()?;
        Ok(())
    }

    pub fn alert_state(&self) -> Result<OnOff, ConfigError> {
        OnOff::from_i32(self.alert_state).ok_or_else(|| {
            ConfigError::Invalid("alert_state".to_string(), self.alert_state.to_string())
        })
    }
}

/// MQTT 投递配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub topic_prefix: String,
    pub qos: u8,
    pub publish_timeout_ms: u64,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub count: i64,
    pub seed: Option<u64>,
    pub sink: SinkKind,
    pub mqtt: MqttConfig,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = GeneratorConfig::default();
        let generator = GeneratorConfig {
            kind: read_parsed_with_default("EVGEN_GENERATOR", defaults.kind)?,
            min_device_id: read_i32_with_default("EVGEN_MIN_DEVICE_ID", defaults.min_device_id)?,
            max_device_id: read_i32_with_default("EVGEN_MAX_DEVICE_ID", defaults.max_device_id)?,
            min_value: read_i32_with_default("EVGEN_MIN_VALUE", defaults.min_value)?,
            max_value: read_i32_with_default("EVGEN_MAX_VALUE", defaults.max_value)?,
            alert_percentage: read_i32_with_default(
                "EVGEN_ALERT_PERCENTAGE",
                defaults.alert_percentage,
            )?,
            alert_state: read_i32_with_default("EVGEN_ALERT_STATE", defaults.alert_state)?,
            message_format: read_parsed_with_default(
                "EVGEN_MESSAGE_FORMAT",
                defaults.message_format,
            )?,
            city: env::var("EVGEN_CITY").unwrap_or(defaults.city),
            country: env::var("EVGEN_COUNTRY").unwrap_or(defaults.country),
        };
        generator.validate()?;

        let count = read_i64_with_default("EVGEN_COUNT", 10)?;
        let seed = read_optional_u64("EVGEN_SEED")?;
        let sink = read_parsed_with_default("EVGEN_SINK", SinkKind::default())?;

        let mqtt = MqttConfig {
            host: env::var("EVGEN_MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: read_u16_with_default("EVGEN_MQTT_PORT", 1883)?,
            username: read_optional("EVGEN_MQTT_USERNAME"),
            password: read_optional("EVGEN_MQTT_PASSWORD"),
            topic_prefix: env::var("EVGEN_MQTT_TOPIC_PREFIX")
                .unwrap_or_else(|_| "evgen/events".to_string()),
            qos: read_u8_with_default("EVGEN_MQTT_QOS", 0)?,
            publish_timeout_ms: read_parsed_with_default("EVGEN_MQTT_PUBLISH_TIMEOUT_MS", 5000)?,
        };
        if mqtt.qos > 2 {
            return Err(ConfigError::Invalid(
                "EVGEN_MQTT_QOS".to_string(),
                mqtt.qos.to_string(),
            ));
        }

        Ok(Self {
            generator,
            count,
            seed,
            sink,
            mqtt,
        })
    }
}

fn read_parsed_with_default<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    let value = match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => return Ok(default),
    };
    value
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_i32_with_default(key: &str, default: i32) -> Result<i32, ConfigError> {
    read_parsed_with_default(key, default)
}

fn read_i64_with_default(key: &str, default: i64) -> Result<i64, ConfigError> {
    read_parsed_with_default(key, default)
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    read_parsed_with_default(key, default)
}

fn read_u8_with_default(key: &str, default: u8) -> Result<u8, ConfigError> {
    read_parsed_with_default(key, default)
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_optional_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alert_state().expect("state"), OnOff::Off);
        assert_eq!(config.city, "Milan");
        assert_eq!(config.country, "Italy");
    }

    #[test]
    fn rejects_inverted_ranges() {
        let config = GeneratorConfig {
            min_device_id: 10,
            max_device_id: 5,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(key, _)) if key == "min_device_id"));

        let config = GeneratorConfig {
            min_value: 200,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_alert_settings() {
        let config = GeneratorConfig {
            alert_percentage: 101,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = GeneratorConfig {
            alert_state: 3,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_kinds() {
        assert_eq!("OnOff".parse::<GeneratorKind>(), Ok(GeneratorKind::OnOff));
        assert_eq!("threshold".parse::<GeneratorKind>(), Ok(GeneratorKind::Threshold));
        assert_eq!("mqtt".parse::<SinkKind>(), Ok(SinkKind::Mqtt));
        assert!("kafka".parse::<SinkKind>().is_err());
    }
}
