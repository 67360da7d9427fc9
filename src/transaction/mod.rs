//! Transaction lifecycle: the per-thread transaction context, the callbacks
//! registered against it, and the manager that completes it.
//!
//! ```text
//! Transaction::begin()        bind TransactionContext to this thread
//!        │
//!        ▼
//! registry.register(cb)       append cb (registration order is kept)
//!        │
//!        ▼
//! commit()                    unbind, cb.after_commit() for each,
//!                             then cb.after_completion(Committed)
//! rollback() / drop           unbind, cb.after_completion(RolledBack)
//! ```

mod context;
mod error;
mod manager;
mod registry;
mod synchronization;

pub use context::TransactionContext;
pub use error::TransactionError;
pub use manager::{in_transaction, Transaction};
pub use registry::{SynchronizationRegistry, ThreadLocalRegistry};
pub use synchronization::{CompletionStatus, Synchronization, SynchronizationError};
