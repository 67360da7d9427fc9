use std::error::Error;

/// Error returned from [`Synchronization::after_commit`].
pub type SynchronizationError = Box<dyn Error + Send + Sync + 'static>;

/// Outcome reported to [`Synchronization::after_completion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionStatus {
    Committed,
    RolledBack,
    /// Completion outcome could not be determined (e.g. a resource failure
    /// in a transaction manager).
    Unknown,
}

/// A lifecycle callback registered against the active transaction.
///
/// The transaction drives each registered callback exactly once at
/// completion:
///
/// - on commit: [`after_commit`](Self::after_commit) for every callback in
///   registration order, then [`after_completion`](Self::after_completion)
///   with [`CompletionStatus::Committed`];
/// - on rollback: only `after_completion` with
///   [`CompletionStatus::RolledBack`].
///
/// `after_completion` takes the boxed callback by value, so a callback can
/// never be invoked again once its transaction is over.
pub trait Synchronization {
    /// Invoked after the transaction committed. An error stops the remaining
    /// after-commit hooks and is returned from the commit.
    fn after_commit(&mut self) -> Result<(), SynchronizationError> {
        Ok(())
    }

    /// Invoked once the transaction is over, whatever the outcome.
    fn after_completion(self: Box<Self>, _status: CompletionStatus) {}
}
