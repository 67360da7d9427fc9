use std::sync::Arc;

use tracing::debug;

use super::dispatcher::{deliver, Dispatcher};
use super::error::PublishError;
use crate::event::Event;
use crate::transaction::{CompletionStatus, Synchronization, SynchronizationError};

/// Lifecycle callback carrying one transaction-bound event.
///
/// On commit the captured event goes through the same delivery path as an
/// immediate publish. Any other completion drops it silently.
pub struct DeferredDispatch<D: ?Sized> {
    dispatcher: Arc<D>,
    event: Event,
    delivered: bool,
}

impl<D: Dispatcher + ?Sized> DeferredDispatch<D> {
    /// Capture `event` for delivery through `dispatcher` after commit.
    ///
    /// `event` must be transaction-bound.
    pub fn new(dispatcher: Arc<D>, event: Event) -> Result<Self, PublishError> {
        if !event.is_transaction_bound() {
            return Err(PublishError::Precondition(format!(
                "event {} ({}) is not transaction-bound and cannot be deferred",
                event.event_type, event.id
            )));
        }

        Ok(Self {
            dispatcher,
            event,
            delivered: false,
        })
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }
}

impl<D: Dispatcher + ?Sized> Synchronization for DeferredDispatch<D> {
    fn after_commit(&mut self) -> Result<(), SynchronizationError> {
        deliver(self.dispatcher.as_ref(), &self.event)?;
        self.delivered = true;
        Ok(())
    }

    fn after_completion(self: Box<Self>, status: CompletionStatus) {
        if !self.delivered {
            debug!(
                event_id = %self.event.id,
                event_type = %self.event.event_type,
                ?status,
                "discarding transaction-bound event"
            );
        }
    }
}
