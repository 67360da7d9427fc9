use serde::Serialize;

use super::event::Binding;

/// A concrete, typed event kind.
///
/// Application code defines its own event structs and declares the type tag
/// listeners match on. Kinds that must wait for the enclosing transaction to
/// commit override [`EventKind::BINDING`].
///
/// ```
/// use serde::Serialize;
/// use txbound::{Binding, Event, EventKind};
///
/// #[derive(Serialize)]
/// struct OrderPlaced {
///     order_id: String,
/// }
///
/// impl EventKind for OrderPlaced {
///     const EVENT_TYPE: &'static str = "OrderPlaced";
///     const BINDING: Binding = Binding::TransactionBound;
/// }
///
/// let event = Event::of("order-service", &OrderPlaced { order_id: "o-1".into() }).unwrap();
/// assert!(event.is_transaction_bound());
/// assert_eq!(event.event_type, "OrderPlaced");
/// ```
pub trait EventKind: Serialize {
    const EVENT_TYPE: &'static str;
    const BINDING: Binding = Binding::Immediate;
}
