use domain::MessageFormat;
use evgen_config::{AppConfig, GeneratorKind, SinkKind};

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("EVGEN_GENERATOR", "onoff");
        std::env::set_var("EVGEN_COUNT", "25");
        std::env::set_var("EVGEN_MESSAGE_FORMAT", "xml");
        std::env::set_var("EVGEN_ALERT_PERCENTAGE", "50");
        std::env::set_var("EVGEN_CITY", "Rome");
        std::env::set_var("EVGEN_SEED", "7");
        std::env::set_var("EVGEN_SINK", "mqtt");
        std::env::set_var("EVGEN_MQTT_PORT", "1884");
        std::env::set_var("EVGEN_MQTT_PUBLISH_TIMEOUT_MS", "250");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.generator.kind, GeneratorKind::OnOff);
    assert_eq!(config.count, 25);
    assert_eq!(config.generator.message_format, MessageFormat::Xml);
    assert_eq!(config.generator.alert_percentage, 50);
    assert_eq!(config.generator.city, "Rome");
    assert_eq!(config.generator.country, "Italy");
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.sink, SinkKind::Mqtt);
    assert_eq!(config.mqtt.port, 1884);
    assert_eq!(config.mqtt.publish_timeout_ms, 250);
    assert_eq!(config.mqtt.topic_prefix, "evgen/events");
}
