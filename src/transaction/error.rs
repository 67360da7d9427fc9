use thiserror::Error;
use uuid::Uuid;

use super::synchronization::SynchronizationError;

/// Error type for transaction lifecycle operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// No transaction is bound to the current thread.
    #[error("no transaction in progress on this thread")]
    NoTransaction,
    /// A transaction is already bound to the current thread. Transactions do
    /// not nest.
    #[error("transaction {current} is already active on this thread")]
    AlreadyActive { current: Uuid },
    /// An after-commit callback failed. The transaction itself is committed;
    /// callbacks registered after `index` did not run their after-commit hook.
    #[error("after-commit callback #{index} of transaction {transaction} failed: {source}")]
    AfterCommit {
        transaction: Uuid,
        index: usize,
        #[source]
        source: SynchronizationError,
    },
}
