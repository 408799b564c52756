use crate::{EventDataGenerator, GeneratorError, build_event_data, generate_batch};
use domain::{EventData, ThresholdDeviceEvent};
use evgen_config::GeneratorConfig;
use rand::{Rng, RngCore};

/// 阈值型设备事件生成器。
#[derive(Debug, Clone)]
pub struct ThresholdGenerator {
    config: GeneratorConfig,
}

impl ThresholdGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn next_payload(&self, rng: &mut dyn RngCore) -> ThresholdDeviceEvent {
        ThresholdDeviceEvent {
            device_id: rng.gen_range(self.config.min_device_id..=self.config.max_device_id),
            value: rng.gen_range(self.config.min_value..=self.config.max_value),
        }
    }
}

impl EventDataGenerator for ThresholdGenerator {
    fn name(&self) -> &'static str {
        "ThresholdGenerator"
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
