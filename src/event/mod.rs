mod error;
mod event;
mod kind;

pub use error::EventError;
pub use event::{Binding, Event};
pub use kind::EventKind;
