use super::error::PublishError;
use crate::event::Event;

/// Trait for publishing application events.
///
/// Callers publish through this trait rather than through a dispatcher
/// directly, so the publishing side can decide when an event is delivered.
pub trait EventPublisher {
    /// Publish a single event.
    fn publish(&self, event: Event) -> Result<(), PublishError>;

    /// Publish multiple events in order.
    ///
    /// Default implementation publishes events sequentially and stops at
    /// the first error.
    fn publish_batch(&self, events: Vec<Event>) -> Result<(), PublishError> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}
