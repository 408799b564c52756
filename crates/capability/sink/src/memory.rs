//! 内存投递实现
//!
//! 仅用于本地测试和演练。

use crate::{EventSink, SinkError};
use domain::EventData;
use std::sync::RwLock;

/// 内存事件收集器
#[derive(Default)]
pub struct MemorySink {
    events: RwLock<Vec<EventData>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    /// 已收集事件数量（用于测试）
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<EventData> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl EventSink for MemorySink {
    async fn send(&self, event: &EventData) -> Result<(), SinkError> {
        let mut events = self
            .events
            .write()
            .map_err(|_| SinkError::Other("lock failed".to_string()))?;
        events.push(event.clone());
        Ok(())
    }
}
