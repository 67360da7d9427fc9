//! Transaction-aware event dispatch.
//!
//! Events are published through a [`TransactionAwareDispatcher`]. Ordinary
//! events reach listeners immediately. Events marked
//! [`Binding::TransactionBound`] wait until the transaction active on the
//! publishing thread commits, and are dropped if it rolls back, so listeners
//! never act on work that did not stick.
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use txbound::{Event, SimpleDispatcher, Transaction, TransactionAwareDispatcher};
//!
//! let dispatcher = TransactionAwareDispatcher::new(SimpleDispatcher::new());
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! dispatcher.inner().on_any(move |event| {
//!     sink.lock().push(event.event_type.clone());
//!     Ok(())
//! });
//!
//! let tx = Transaction::begin().unwrap();
//! dispatcher.publish(Event::transaction_bound("orders", "OrderPlaced").unwrap()).unwrap();
//! dispatcher.publish(Event::immediate("orders", "CartViewed").unwrap()).unwrap();
//! assert_eq!(*seen.lock(), vec!["CartViewed"]);
//!
//! tx.commit().unwrap();
//! assert_eq!(*seen.lock(), vec!["CartViewed", "OrderPlaced"]);
//! ```

pub mod dispatch;
pub mod event;
pub mod transaction;

#[cfg(feature = "emitter")]
pub use dispatch::EmitterDispatcher;
pub use dispatch::{
    DeferredDispatch, DispatchError, Dispatcher, EventPublisher, ListenerError,
    ListenerErrorPolicy, ListenerId, LogDispatcher, PublishError, SimpleDispatcher,
    TransactionAwareDispatcher,
};
pub use event::{Binding, Event, EventError, EventKind};
pub use transaction::{
    in_transaction, CompletionStatus, Synchronization, SynchronizationError,
    SynchronizationRegistry, ThreadLocalRegistry, Transaction, TransactionContext,
    TransactionError,
};

// Re-export the EventEmitter backing `EmitterDispatcher`
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
