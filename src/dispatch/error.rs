use std::error::Error;

use thiserror::Error;

use super::simple::ListenerId;
use crate::transaction::TransactionError;

/// Error a listener returns to reject an event.
pub type ListenerError = Box<dyn Error + Send + Sync + 'static>;

/// Error type for handing an event to listeners.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A listener failed while handling the event.
    #[error("{listener} failed handling {event_type}: {source}")]
    Listener {
        listener: ListenerId,
        event_type: String,
        #[source]
        source: ListenerError,
    },
    /// The dispatcher backend itself failed.
    #[error("dispatcher backend failed for {event_type}: {source}")]
    Backend {
        event_type: String,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
}

/// Error type for publish operations.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A transaction-bound event was published outside any transaction.
    ///
    /// This is always a bug at the call site; the event is not delivered.
    #[error("transactional event {event_type} ({event_id}) published with no transaction in progress")]
    NoActiveTransaction { event_type: String, event_id: String },
    /// A caller broke a documented precondition.
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}
