use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use super::dispatcher::Dispatcher;
use super::error::DispatchError;
use crate::event::Event;

/// A dispatcher that records every event as a log line, either into a
/// shared buffer or through `tracing`.
pub struct LogDispatcher {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDispatcher {
    pub fn new() -> Self {
        LogDispatcher { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogDispatcher {
            buffer: Some(buffer),
        }
    }
}

impl Dispatcher for LogDispatcher {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        let payload = String::from_utf8_lossy(&event.payload);
        let line = format!("[EVENT] {} {} {}", event.event_type, event.source, payload);
        match &self.buffer {
            Some(buffer) => buffer.lock().push(line),
            None => info!(event_id = %event.id, "{}", line),
        }
        Ok(())
    }
}
