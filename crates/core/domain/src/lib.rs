pub mod data;
pub mod event;

pub use data::{EventData, PropertyValue};
pub use event::{
    EVENT_NAMESPACE, EventPayload, MessageFormat, OnOff, OnOffDeviceEvent, ParseFormatError,
    ThresholdDeviceEvent,
};
