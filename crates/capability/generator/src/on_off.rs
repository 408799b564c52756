use crate::{EventDataGenerator, GeneratorError, build_event_data, generate_batch};
use domain::{EventData, OnOff, OnOffDeviceEvent};
use evgen_config::GeneratorConfig;
use rand::{Rng, RngCore};

/// 开关型设备事件生成器。
///
/// 每条事件以 `alert_percentage`% 的概率取告警态，否则取其反面（正常态）。
#[derive(Debug, Clone)]
pub struct OnOffGenerator {
    config: GeneratorConfig,
    alert_state: OnOff,
}

impl OnOffGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        let alert_state = config.alert_state()?;
        Ok(Self {
            config,
            alert_state,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn next_payload(&self, rng: &mut dyn RngCore) -> OnOffDeviceEvent {
        let device_id = rng.gen_range(self.config.min_device_id..=self.config.max_device_id);
        let roll = rng.gen_range(1..=100);
        let value = if roll <= self.config.alert_percentage {
            self.alert_state
        } else {
            self.alert_state.opposite()
        };
        OnOffDeviceEvent { device_id, value }
    }
}

impl EventDataGenerator for OnOffGenerator {
    fn name(&self) -> &'static str {
        "OnOffGenerator"
    }

    fn generate_with_rng(
        &self,
        count: i64,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<EventData>, GeneratorError> {
        generate_batch(self.name(), count, || {
            let payload = self.next_payload(rng);
            build_event_data(&payload, &self.config)
        })
    }
}
