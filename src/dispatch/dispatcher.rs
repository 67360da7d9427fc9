use std::sync::Arc;

use tracing::trace;

use super::error::DispatchError;
use crate::event::Event;

/// Trait for handing an event to every interested listener.
///
/// This is the plain, immediate delivery path. Implementations decide how
/// listeners are registered, in which order they run, and on which thread:
///
/// - `SimpleDispatcher` - synchronous, in-process listeners
/// - `LogDispatcher` - writes events to a buffer or the log
/// - `EmitterDispatcher` - fan-out through `event_emitter_rs`
pub trait Dispatcher: Send + Sync {
    /// Deliver `event` to the registered listeners.
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        (**self).dispatch(event)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        (**self).dispatch(event)
    }
}

impl<D: Dispatcher + ?Sized> Dispatcher for &D {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        (**self).dispatch(event)
    }
}

/// The single delivery path shared by immediate publishing and after-commit
/// replay.
pub(crate) fn deliver<D: Dispatcher + ?Sized>(
    dispatcher: &D,
    event: &Event,
) -> Result<(), DispatchError> {
    trace!(
        event_id = %event.id,
        event_type = %event.event_type,
        binding = ?event.binding,
        "dispatching event"
    );
    dispatcher.dispatch(event)
}
