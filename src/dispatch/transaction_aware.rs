//! Dispatcher that holds transaction-bound events until commit.

use std::sync::Arc;

use tracing::debug;

use super::deferred::DeferredDispatch;
use super::dispatcher::{deliver, Dispatcher};
use super::error::PublishError;
use super::publisher::EventPublisher;
use crate::event::Event;
use crate::transaction::{SynchronizationRegistry, ThreadLocalRegistry};

/// Wraps a base [`Dispatcher`] and decides when each event reaches it.
///
/// - Immediate events are forwarded right away. The transaction registry is
///   not consulted.
/// - Transaction-bound events are captured in a [`DeferredDispatch`] and
///   registered with the active transaction; they are forwarded after it
///   commits and dropped if it rolls back.
/// - Publishing a transaction-bound event with no active transaction fails
///   with [`PublishError::NoActiveTransaction`] and delivers nothing.
///
/// ## Example
///
/// ```
/// use txbound::{Event, SimpleDispatcher, Transaction, TransactionAwareDispatcher};
///
/// let dispatcher = TransactionAwareDispatcher::new(SimpleDispatcher::new());
/// dispatcher.inner().on("OrderPlaced", |event| {
///     println!("{} committed", event.event_type);
///     Ok(())
/// });
///
/// let tx = Transaction::begin().unwrap();
/// dispatcher
///     .publish(Event::transaction_bound("order-service", "OrderPlaced").unwrap())
///     .unwrap();
/// tx.commit().unwrap(); // listener runs here
/// ```
pub struct TransactionAwareDispatcher<D, R = ThreadLocalRegistry> {
    inner: Arc<D>,
    registry: R,
}

impl<D: Dispatcher + 'static> TransactionAwareDispatcher<D> {
    /// Wrap `inner`, binding deferred events to the current thread's
    /// transaction.
    pub fn new(inner: D) -> Self {
        Self::from_arc(Arc::new(inner))
    }

    /// Wrap a base dispatcher that is shared with other owners.
    pub fn from_arc(inner: Arc<D>) -> Self {
        Self {
            inner,
            registry: ThreadLocalRegistry,
        }
    }
}

impl<D, R> TransactionAwareDispatcher<D, R>
where
    D: Dispatcher + 'static,
    R: SynchronizationRegistry,
{
    /// Wrap `inner`, binding deferred events through `registry`.
    pub fn with_registry(inner: D, registry: R) -> Self {
        Self {
            inner: Arc::new(inner),
            registry,
        }
    }

    /// The base dispatcher, e.g. to register listeners.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Publish an event, deferring it if it is transaction-bound.
    pub fn publish(&self, event: Event) -> Result<(), PublishError> {
        if !event.is_transaction_bound() {
            return deliver(self.inner.as_ref(), &event).map_err(PublishError::from);
        }

        if !self.registry.is_active() {
            return Err(PublishError::NoActiveTransaction {
                event_type: event.event_type,
                event_id: event.id,
            });
        }

        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            "deferring transaction-bound event until commit"
        );
        let deferred = DeferredDispatch::new(Arc::clone(&self.inner), event)?;
        self.registry.register(Box::new(deferred))?;
        Ok(())
    }
}

impl<D, R> EventPublisher for TransactionAwareDispatcher<D, R>
where
    D: Dispatcher + 'static,
    R: SynchronizationRegistry,
{
    fn publish(&self, event: Event) -> Result<(), PublishError> {
        TransactionAwareDispatcher::publish(self, event)
    }
}
