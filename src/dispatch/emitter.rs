use event_emitter_rs::EventEmitter;
use parking_lot::Mutex;

use super::dispatcher::Dispatcher;
use super::error::DispatchError;
use crate::event::Event;

/// A dispatcher that fans events out through an [`EventEmitter`].
///
/// The emitter runs each listener on its own thread, so `dispatch` returns
/// before listeners have finished and no ordering between listeners (or
/// between successive events) is guaranteed. Use `SimpleDispatcher` when
/// ordering matters.
pub struct EmitterDispatcher {
    emitter: Mutex<EventEmitter>,
}

impl EmitterDispatcher {
    pub fn new() -> Self {
        Self::from_emitter(EventEmitter::new())
    }

    pub fn from_emitter(emitter: EventEmitter) -> Self {
        EmitterDispatcher {
            emitter: Mutex::new(emitter),
        }
    }

    /// Register a listener for an event type. Returns the emitter's listener id.
    pub fn on<F>(&self, event_type: &str, listener: F) -> String
    where
        F: Fn(Event) + Send + Sync + 'static,
    {
        self.emitter.lock().on(event_type, listener)
    }
}

impl Default for EmitterDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for EmitterDispatcher {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        self.emitter.lock().emit(&event.event_type, event.clone());
        Ok(())
    }
}
