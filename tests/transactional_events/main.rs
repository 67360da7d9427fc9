
use std::sync::Arc;

use support::{
    bound, event_ids, event_types, immediate, recording_dispatcher, OrderError, OrderPlaced,
    OrderService,
};
use txbound::{
    in_transaction, DispatchError, LogDispatcher, PublishError, SimpleDispatcher,
    SynchronizationRegistry, ThreadLocalRegistry, Transaction, TransactionAwareDispatcher,
    TransactionError,
};

// =============================================================================
// Immediate events
// =============================================================================

#[test]
fn immediate_event_is_delivered_once_without_transaction() {
    let (dispatcher, journal) = recording_dispatcher();
    let event = immediate("CartViewed");
    let id = event.id.clone();

    dispatcher.publish(event).unwrap();

    assert_eq!(event_ids(&journal), vec![id]);
}

#[test]
fn immediate_event_is_delivered_synchronously_inside_transaction() {
    let (dispatcher, journal) = recording_dispatcher();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(immediate("CartViewed")).unwrap();
    assert_eq!(event_types(&journal), vec!["CartViewed"]);

    tx.rollback();
    // rollback does not take back what was already delivered
    assert_eq!(event_types(&journal), vec!["CartViewed"]);
}

// =============================================================================
// Missing transaction
// =============================================================================

#[test]
fn bound_event_without_transaction_fails_and_is_never_delivered() {
    let (dispatcher, journal) = recording_dispatcher();

    let err = dispatcher.publish(bound("OrderPlaced")).unwrap_err();

    assert!(matches!(err, PublishError::NoActiveTransaction { .. }));
    assert!(err.to_string().contains("no transaction in progress"));

    // a later transaction does not resurrect it
    Transaction::begin().unwrap().commit().unwrap();
    assert!(journal.lock().is_empty());
}

#[test]
fn bound_event_after_transaction_completed_fails() {
    let (dispatcher, _journal) = recording_dispatcher();

    Transaction::begin().unwrap().commit().unwrap();
    let err = dispatcher.publish(bound("OrderPlaced")).unwrap_err();

    assert!(matches!(err, PublishError::NoActiveTransaction { .. }));
}

// =============================================================================
// Commit
// =============================================================================

#[test]
fn bound_event_is_delivered_exactly_once_after_commit() {
    let (dispatcher, journal) = recording_dispatcher();
    let event = bound("OrderPlaced");
    let original = event.clone();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(event).unwrap();
    assert!(journal.lock().is_empty());

    tx.commit().unwrap();

    let delivered = journal.lock().clone();
    assert_eq!(delivered, vec![original]);
}

#[test]
fn successive_transactions_deliver_their_own_events() {
    let (dispatcher, journal) = recording_dispatcher();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("First")).unwrap();
    tx.commit().unwrap();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("Second")).unwrap();
    tx.commit().unwrap();

    assert_eq!(event_types(&journal), vec!["First", "Second"]);
}

// =============================================================================
// Rollback
// =============================================================================

#[test]
fn bound_event_is_discarded_on_rollback() {
    let (dispatcher, journal) = recording_dispatcher();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("OrderPlaced")).unwrap();
    tx.rollback();

    Transaction::begin().unwrap().commit().unwrap();
    assert!(journal.lock().is_empty());
}

#[test]
fn bound_event_is_discarded_when_transaction_is_dropped() {
    let (dispatcher, journal) = recording_dispatcher();

    {
        let _tx = Transaction::begin().unwrap();
        dispatcher.publish(bound("OrderPlaced")).unwrap();
    }

    assert!(journal.lock().is_empty());
    assert!(!ThreadLocalRegistry.is_active());
}

#[test]
fn bound_event_is_discarded_when_transaction_panics() {
    let (dispatcher, journal) = recording_dispatcher();
    let dispatcher = Arc::new(dispatcher);

    let inner = Arc::clone(&dispatcher);
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _ = in_transaction(|| -> Result<(), PublishError> {
            inner.publish(bound("OrderPlaced"))?;
            panic!("business logic blew up");
        });
    }));

    assert!(outcome.is_err());
    assert!(journal.lock().is_empty());
    assert!(!ThreadLocalRegistry.is_active());
}

// =============================================================================
// Mixed sequence
// =============================================================================

#[test]
fn immediate_event_overtakes_deferred_event() {
    let (dispatcher, journal) = recording_dispatcher();

    let tx = Transaction::begin().unwrap();

    dispatcher.publish(bound("E1")).unwrap();
    assert!(journal.lock().is_empty());

    dispatcher.publish(immediate("E2")).unwrap();
    assert_eq!(event_types(&journal), vec!["E2"]);

    tx.commit().unwrap();
    assert_eq!(event_types(&journal), vec!["E2", "E1"]);
}

// =============================================================================
// Listener failures
// =============================================================================

#[test]
fn listener_failure_propagates_out_of_commit() {
    let (dispatcher, journal) = recording_dispatcher();
    dispatcher
        .inner()
        .on("Poison", |_| Err("cannot handle poison".into()));

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("Before")).unwrap();
    dispatcher.publish(bound("Poison")).unwrap();
    dispatcher.publish(bound("After")).unwrap();

    let err = tx.commit().unwrap_err();

    let TransactionError::AfterCommit { index, source, .. } = err else {
        panic!("expected an after-commit failure");
    };
    assert_eq!(index, 1);
    let dispatch = source
        .downcast_ref::<DispatchError>()
        .expect("source should be the dispatch error");
    assert!(matches!(dispatch, DispatchError::Listener { event_type, .. } if event_type == "Poison"));

    // the catch-all listener ran before the failing one; "After" is dropped
    assert_eq!(event_types(&journal), vec!["Before", "Poison"]);
    assert!(!ThreadLocalRegistry.is_active());
}

#[test]
fn listener_failure_on_immediate_event_propagates_from_publish() {
    let (dispatcher, _journal) = recording_dispatcher();
    dispatcher.inner().on("Poison", |_| Err("nope".into()));

    let err = dispatcher.publish(immediate("Poison")).unwrap_err();

    assert!(matches!(err, PublishError::Dispatch(DispatchError::Listener { .. })));
}

// =============================================================================
// Publishing from listeners
// =============================================================================

#[test]
fn listener_publishing_bound_event_after_commit_is_rejected() {
    let dispatcher = Arc::new(TransactionAwareDispatcher::new(SimpleDispatcher::new()));
    let nested_result = Arc::new(parking_lot::Mutex::new(None));

    let publisher = Arc::downgrade(&dispatcher);
    let slot = Arc::clone(&nested_result);
    dispatcher.inner().on("OrderPlaced", move |_| {
        if let Some(publisher) = publisher.upgrade() {
            *slot.lock() = Some(publisher.publish(bound("InvoiceRequested")));
        }
        Ok(())
    });

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("OrderPlaced")).unwrap();
    tx.commit().unwrap();

    let nested = nested_result.lock().take().expect("listener never ran");
    assert!(matches!(nested, Err(PublishError::NoActiveTransaction { .. })));
}

#[test]
fn listener_may_start_its_own_transaction_after_commit() {
    let (dispatcher, journal) = recording_dispatcher();
    let dispatcher = Arc::new(dispatcher);

    let publisher = Arc::downgrade(&dispatcher);
    dispatcher.inner().on("OrderPlaced", move |_| {
        let Some(publisher) = publisher.upgrade() else {
            return Ok(());
        };
        in_transaction(|| publisher.publish(bound("InvoiceRequested")))?;
        Ok(())
    });

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(bound("OrderPlaced")).unwrap();
    tx.commit().unwrap();

    assert_eq!(event_types(&journal), vec!["OrderPlaced", "InvoiceRequested"]);
}

// =============================================================================
// Order service scenario
// =============================================================================

#[test]
fn order_service_announces_committed_orders() {
    let (dispatcher, journal) = recording_dispatcher();
    let service = OrderService::new(Arc::new(dispatcher));

    service.place("order-1", 4200).unwrap();

    assert_eq!(event_types(&journal), vec!["CheckoutStarted", "OrderPlaced"]);
    let placed: OrderPlaced = journal.lock()[1].decode().unwrap();
    assert_eq!(
        placed,
        OrderPlaced {
            order_id: "order-1".into(),
            total_cents: 4200
        }
    );
}

#[test]
fn order_service_keeps_rejected_orders_quiet() {
    let (dispatcher, journal) = recording_dispatcher();
    let service = OrderService::new(Arc::new(dispatcher));

    let err = service.place("order-2", 0).unwrap_err();

    assert!(matches!(err, OrderError::Empty(id) if id == "order-2"));
    // the immediate announcement went out, the bound one was rolled back
    assert_eq!(event_types(&journal), vec!["CheckoutStarted"]);
}

#[test]
fn order_service_refuses_nested_transactions() {
    let (dispatcher, _journal) = recording_dispatcher();
    let service = OrderService::new(Arc::new(dispatcher));

    let outer = Transaction::begin().unwrap();
    let err = service.place("order-3", 100).unwrap_err();
    outer.rollback();

    assert!(matches!(
        err,
        OrderError::Transaction(TransactionError::AlreadyActive { .. })
    ));
}

// =============================================================================
// Other base dispatchers
// =============================================================================

#[test]
fn log_dispatcher_sees_bound_events_only_after_commit() {
    let buffer = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let dispatcher = TransactionAwareDispatcher::new(LogDispatcher::with_buffer(buffer.clone()));

    let tx = Transaction::begin().unwrap();
    dispatcher
        .publish(bound("OrderPlaced").with_string_payload("order-1"))
        .unwrap();
    assert!(buffer.lock().is_empty());
    tx.commit().unwrap();

    assert_eq!(*buffer.lock(), vec!["[EVENT] OrderPlaced test-suite order-1"]);
}

#[cfg(feature = "emitter")]
#[test]
fn emitter_dispatcher_fires_after_commit() {
    use std::sync::mpsc;
    use std::time::Duration;
    use txbound::{EmitterDispatcher, Event};

    let dispatcher = TransactionAwareDispatcher::new(EmitterDispatcher::new());
    let (tx_events, rx_events) = mpsc::channel();
    let tx_events = parking_lot::Mutex::new(tx_events);
    dispatcher.inner().on("OrderPlaced", move |event: Event| {
        tx_events.lock().send(event.id).unwrap();
    });

    let event = bound("OrderPlaced");
    let id = event.id.clone();

    let tx = Transaction::begin().unwrap();
    dispatcher.publish(event).unwrap();
    assert!(rx_events.recv_timeout(Duration::from_millis(50)).is_err());
    tx.commit().unwrap();

    let received = rx_events
        .recv_timeout(Duration::from_secs(1))
        .expect("OrderPlaced callback never fired");
    assert_eq!(received, id);
}
