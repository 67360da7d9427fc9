use std::cell::RefCell;

use uuid::Uuid;

use super::context::TransactionContext;
use super::error::TransactionError;
use super::synchronization::Synchronization;

/// Registration side of the transaction lifecycle: the contract the
/// transaction-aware dispatcher consumes.
pub trait SynchronizationRegistry {
    /// Whether a transaction is active for the current execution context.
    fn is_active(&self) -> bool;

    /// Append a callback to the active transaction.
    ///
    /// Fails with [`TransactionError::NoTransaction`] when nothing is active.
    fn register(&self, synchronization: Box<dyn Synchronization>) -> Result<(), TransactionError>;
}

impl<R: SynchronizationRegistry + ?Sized> SynchronizationRegistry for &R {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn register(&self, synchronization: Box<dyn Synchronization>) -> Result<(), TransactionError> {
        (**self).register(synchronization)
    }
}

thread_local! {
    static CURRENT: RefCell<Option<TransactionContext>> = RefCell::new(None);
}

/// Registry backed by thread-local storage: each OS thread has at most one
/// active [`TransactionContext`], bound by [`Transaction::begin`] and
/// unbound when that transaction completes.
///
/// The registry itself is stateless, so one value can be shared freely
/// between threads; every call resolves against the calling thread.
///
/// [`Transaction::begin`]: crate::Transaction::begin
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadLocalRegistry;

impl ThreadLocalRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Id of the transaction bound to this thread, if any.
    pub fn current_transaction_id(&self) -> Option<Uuid> {
        CURRENT.with(|current| current.borrow().as_ref().map(TransactionContext::id))
    }

    /// Number of callbacks waiting on this thread's transaction.
    pub fn pending_synchronizations(&self) -> usize {
        CURRENT.with(|current| current.borrow().as_ref().map_or(0, TransactionContext::len))
    }
}

impl SynchronizationRegistry for ThreadLocalRegistry {
    fn is_active(&self) -> bool {
        CURRENT.with(|current| current.borrow().is_some())
    }

    fn register(&self, synchronization: Box<dyn Synchronization>) -> Result<(), TransactionError> {
        CURRENT.with(|current| match current.borrow_mut().as_mut() {
            Some(context) => {
                context.register(synchronization);
                Ok(())
            }
            None => Err(TransactionError::NoTransaction),
        })
    }
}

/// Bind `context` to the current thread.
pub(crate) fn bind(context: TransactionContext) -> Result<(), TransactionError> {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        if let Some(active) = current.as_ref() {
            return Err(TransactionError::AlreadyActive {
                current: active.id(),
            });
        }
        *current = Some(context);
        Ok(())
    })
}

/// Remove the current thread's context so its callbacks can run without the
/// thread-local being borrowed.
pub(crate) fn unbind() -> Option<TransactionContext> {
    CURRENT.with(|current| current.borrow_mut().take())
}
