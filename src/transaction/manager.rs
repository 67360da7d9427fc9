//! A synchronization-only transaction manager.
//!
//! [`Transaction`] demarcates a unit of work on the current thread and drives
//! the registered lifecycle callbacks when it completes. It does not touch
//! any resource itself: pair it with whatever actually persists the work
//! (commit the resource first, then commit the `Transaction`).

use std::marker::PhantomData;

use tracing::{debug, warn};
use uuid::Uuid;

use super::context::TransactionContext;
use super::error::TransactionError;
use super::registry;
use super::synchronization::CompletionStatus;

/// Handle to the transaction bound to the current thread.
///
/// Dropping the handle without calling [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) rolls the transaction back. The handle is
/// neither `Send` nor `Sync`: it must complete on the thread that began it.
///
/// ## Example
///
/// ```
/// use txbound::{Transaction, ThreadLocalRegistry, SynchronizationRegistry};
///
/// let tx = Transaction::begin().unwrap();
/// assert!(ThreadLocalRegistry.is_active());
/// tx.commit().unwrap();
/// assert!(!ThreadLocalRegistry.is_active());
/// ```
#[derive(Debug)]
pub struct Transaction {
    id: Uuid,
    name: Option<String>,
    completed: bool,
    _thread_bound: PhantomData<*const ()>,
}

impl Transaction {
    /// Begin a transaction on the current thread.
    ///
    /// Fails with [`TransactionError::AlreadyActive`] if one is already
    /// running here: transactions do not nest.
    pub fn begin() -> Result<Self, TransactionError> {
        Self::start(None)
    }

    /// Begin a named transaction. The name only shows up in logs.
    pub fn begin_named(name: impl Into<String>) -> Result<Self, TransactionError> {
        Self::start(Some(name.into()))
    }

    fn start(name: Option<String>) -> Result<Self, TransactionError> {
        let context = TransactionContext::new(name.clone());
        let id = context.id();
        registry::bind(context)?;
        debug!(transaction = %id, name = ?name, "transaction started");

        Ok(Self {
            id,
            name,
            completed: false,
            _thread_bound: PhantomData,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Commit: run every after-commit callback in registration order, then
    /// report completion to all of them.
    ///
    /// The first failing after-commit callback stops the remaining
    /// after-commit hooks; its error is returned after completion has still
    /// been reported to every callback.
    pub fn commit(mut self) -> Result<(), TransactionError> {
        self.completed = true;
        complete(self.id, CompletionStatus::Committed)
    }

    /// Roll back: report completion to every callback without running any
    /// after-commit hook.
    pub fn rollback(mut self) {
        self.completed = true;
        if let Err(err) = complete(self.id, CompletionStatus::RolledBack) {
            warn!(transaction = %self.id, error = %err, "rollback found no bound transaction");
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        warn!(transaction = %self.id, "transaction dropped without commit or rollback; rolling back");
        if let Err(err) = complete(self.id, CompletionStatus::RolledBack) {
            warn!(transaction = %self.id, error = %err, "rollback found no bound transaction");
        }
    }
}

fn complete(id: Uuid, status: CompletionStatus) -> Result<(), TransactionError> {
    let context = registry::unbind().ok_or(TransactionError::NoTransaction)?;
    debug_assert_eq!(context.id(), id);

    let mut synchronizations = context.into_synchronizations();
    let count = synchronizations.len();
    let mut outcome = Ok(());

    if status == CompletionStatus::Committed {
        for (index, synchronization) in synchronizations.iter_mut().enumerate() {
            if let Err(source) = synchronization.after_commit() {
                outcome = Err(TransactionError::AfterCommit {
                    transaction: id,
                    index,
                    source,
                });
                break;
            }
        }
    }

    for synchronization in synchronizations {
        synchronization.after_completion(status);
    }

    debug!(transaction = %id, ?status, callbacks = count, "transaction completed");
    outcome
}

/// Run `f` inside a new transaction: commit when it returns `Ok`, roll back
/// when it returns `Err` (or panics).
///
/// ```
/// use txbound::{in_transaction, TransactionError};
///
/// let value: Result<u32, TransactionError> = in_transaction(|| Ok(42));
/// assert_eq!(value.unwrap(), 42);
/// ```
pub fn in_transaction<T, E, F>(f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<TransactionError>,
{
    let transaction = Transaction::begin()?;
    match f() {
        Ok(value) => {
            transaction.commit()?;
            Ok(value)
        }
        Err(err) => {
            transaction.rollback();
            Err(err)
        }
    }
}
