//! Event dispatch: base dispatchers and the transaction-aware wrapper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               TransactionAwareDispatcher                     │
//! │  publish(event): immediate → deliver now                    │
//! │                  transaction-bound → DeferredDispatch        │
//! └─────────────────────────────────────────────────────────────┘
//!          │ deliver()                         │ register()
//!          ▼                                   ▼
//! ┌──────────────────────┐        ┌────────────────────────────┐
//! │  Dispatcher (trait)  │◄───────│ SynchronizationRegistry     │
//! │  dispatch(&event)    │ after  │ (thread-local transaction)  │
//! └──────────────────────┘ commit └────────────────────────────┘
//!      │            │              │
//!      ▼            ▼              ▼
//! ┌──────────┐ ┌──────────┐ ┌──────────────────┐
//! │  Simple  │ │   Log    │ │  Emitter         │
//! │Dispatcher│ │Dispatcher│ │  (feature)       │
//! └──────────┘ └──────────┘ └──────────────────┘
//! ```

mod deferred;
mod dispatcher;
#[cfg(feature = "emitter")]
mod emitter;
mod error;
mod log;
mod publisher;
mod simple;
mod transaction_aware;

pub use deferred::DeferredDispatch;
pub use dispatcher::Dispatcher;
#[cfg(feature = "emitter")]
pub use emitter::EmitterDispatcher;
pub use error::{DispatchError, ListenerError, PublishError};
pub use log::LogDispatcher;
pub use publisher::EventPublisher;
pub use simple::{ListenerErrorPolicy, ListenerId, SimpleDispatcher};
pub use transaction_aware::TransactionAwareDispatcher;
