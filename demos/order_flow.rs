//! Walks through immediate, committed, rolled-back and rejected publishes.
//!
//! Run with `RUST_LOG=txbound=debug cargo run --example order_flow` to see
//! deferral and discard decisions.

use serde::Serialize;
use tracing_subscriber::EnvFilter;
use txbound::{
    in_transaction, Binding, Event, EventKind, PublishError, SimpleDispatcher, Transaction,
    TransactionAwareDispatcher,
};

#[derive(Serialize)]
struct OrderPlaced {
    order_id: String,
}

impl EventKind for OrderPlaced {
    const EVENT_TYPE: &'static str = "OrderPlaced";
    const BINDING: Binding = Binding::TransactionBound;
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let events = TransactionAwareDispatcher::new(SimpleDispatcher::new());
    events.inner().on_any(|event| {
        println!("  -> {} from {}", event.event_type, event.source);
        Ok(())
    });

    println!("immediate event, no transaction:");
    events.publish(Event::immediate("shop", "CartViewed")?)?;

    println!("transaction that commits:");
    let tx = Transaction::begin_named("order-1")?;
    events.publish(Event::of("shop", &OrderPlaced { order_id: "order-1".into() })?)?;
    println!("  (published, nothing delivered yet)");
    tx.commit()?;

    println!("transaction that rolls back:");
    let declined = Event::of("shop", &OrderPlaced { order_id: "order-2".into() })?;
    let rolled_back: Result<(), PublishError> = in_transaction(|| {
        events.publish(declined)?;
        Err(PublishError::Precondition("payment declined".into()))
    });
    println!("  (rolled back: {})", rolled_back.unwrap_err());

    println!("transaction-bound event outside a transaction:");
    let err = events
        .publish(Event::of("shop", &OrderPlaced { order_id: "order-3".into() })?)
        .unwrap_err();
    println!("  (rejected: {err})");

    Ok(())
}
