use std::fmt;

use uuid::Uuid;

use super::synchronization::Synchronization;

/// State of one active unit of work: its identity and the callbacks
/// registered against it, in registration order.
pub struct TransactionContext {
    id: Uuid,
    name: Option<String>,
    synchronizations: Vec<Box<dyn Synchronization>>,
}

impl TransactionContext {
    pub fn new(name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            synchronizations: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Append a callback. Callbacks are only ever appended.
    pub fn register(&mut self, synchronization: Box<dyn Synchronization>) {
        self.synchronizations.push(synchronization);
    }

    /// Number of callbacks registered so far.
    pub fn len(&self) -> usize {
        self.synchronizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synchronizations.is_empty()
    }

    /// Consume the context, yielding its callbacks in registration order.
    pub fn into_synchronizations(self) -> Vec<Box<dyn Synchronization>> {
        self.synchronizations
    }
}

impl fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("synchronizations", &self.synchronizations.len())
            .finish()
    }
}
