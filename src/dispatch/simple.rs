//! Synchronous in-process dispatcher.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use super::dispatcher::Dispatcher;
use super::error::{DispatchError, ListenerError};
use crate::event::Event;

type ListenerFn = dyn Fn(&Event) -> Result<(), ListenerError> + Send + Sync;

/// Handle returned when registering a listener, used to remove it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// What to do when a listener returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerErrorPolicy {
    /// Stop at the failing listener and return its error to the caller.
    #[default]
    Propagate,
    /// Log the failure and keep delivering to the remaining listeners.
    LogAndContinue,
}

struct Registration {
    id: ListenerId,
    /// `None` matches every event type.
    event_type: Option<String>,
    listener: Arc<ListenerFn>,
}

/// Dispatcher that invokes listeners synchronously on the caller's thread,
/// in the order they were registered.
///
/// The listener table is not locked while listeners run, so a listener may
/// publish further events or register new listeners.
///
/// ## Example
///
/// ```
/// use txbound::{Dispatcher, Event, SimpleDispatcher};
///
/// let dispatcher = SimpleDispatcher::new();
/// dispatcher.on("OrderPlaced", |event| {
///     println!("order placed by {}", event.source);
///     Ok(())
/// });
///
/// let event = Event::immediate("order-service", "OrderPlaced").unwrap();
/// dispatcher.dispatch(&event).unwrap();
/// ```
pub struct SimpleDispatcher {
    listeners: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
    error_policy: ListenerErrorPolicy,
}

impl SimpleDispatcher {
    pub fn new() -> Self {
        SimpleDispatcher {
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            error_policy: ListenerErrorPolicy::default(),
        }
    }

    /// Set how listener failures are handled.
    pub fn with_error_policy(mut self, policy: ListenerErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn error_policy(&self) -> ListenerErrorPolicy {
        self.error_policy
    }

    /// Register a listener for one event type.
    pub fn on<F>(&self, event_type: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.register(Some(event_type.into()), Arc::new(listener))
    }

    /// Register a listener for every event type.
    pub fn on_any<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    fn register(&self, event_type: Option<String>, listener: Arc<ListenerFn>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push(Registration {
            id,
            event_type,
            listener,
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|registration| registration.id != id);
        listeners.len() != before
    }

    /// Number of listeners an event of `event_type` would reach.
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .read()
            .iter()
            .filter(|registration| registration.matches(event_type))
            .count()
    }

    fn matching(&self, event_type: &str) -> Vec<(ListenerId, Arc<ListenerFn>)> {
        self.listeners
            .read()
            .iter()
            .filter(|registration| registration.matches(event_type))
            .map(|registration| (registration.id, Arc::clone(&registration.listener)))
            .collect()
    }
}

impl Registration {
    fn matches(&self, event_type: &str) -> bool {
        self.event_type.as_deref().map_or(true, |t| t == event_type)
    }
}

impl Default for SimpleDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for SimpleDispatcher {
    fn dispatch(&self, event: &Event) -> Result<(), DispatchError> {
        for (id, listener) in self.matching(&event.event_type) {
            let Err(source) = listener(event) else {
                continue;
            };
            match self.error_policy {
                ListenerErrorPolicy::Propagate => {
                    return Err(DispatchError::Listener {
                        listener: id,
                        event_type: event.event_type.clone(),
                        source,
                    });
                }
                ListenerErrorPolicy::LogAndContinue => {
                    warn!(
                        listener = %id,
                        event_id = %event.id,
                        event_type = %event.event_type,
                        error = %source,
                        "listener failed; continuing"
                    );
                }
            }
        }
        Ok(())
    }
}
