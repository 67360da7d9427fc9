//! The event value handed to dispatchers and listeners.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::EventError;
use super::kind::EventKind;

/// How an event is delivered.
///
/// This is the classification the transaction-aware dispatcher acts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// Handed to listeners as soon as it is published.
    #[default]
    Immediate,
    /// Held back until the surrounding transaction commits, dropped on rollback.
    TransactionBound,
}

/// An application event.
///
/// Events are immutable once built: the builder methods consume `self`, and
/// there are no setters. Dispatchers only ever see `&Event`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for this event (UUID v4 unless overridden)
    pub id: String,
    /// Component that raised the event (e.g. "order-service")
    pub source: String,
    /// Event type used for listener matching (e.g. "OrderPlaced")
    pub event_type: String,
    /// Immediate or transaction-bound delivery
    pub binding: Binding,
    /// Serialized payload (bitcode, JSON, or plain text)
    pub payload: Vec<u8>,
    /// Optional metadata (headers, correlation IDs, etc.)
    pub metadata: Option<Vec<(String, String)>>,
    /// When the event was created
    pub occurred_at: DateTime<Utc>,
}

impl Event {
    /// Create an event delivered as soon as it is published.
    pub fn immediate(
        source: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Result<Self, EventError> {
        Self::new(source, event_type, Binding::Immediate)
    }

    /// Create an event delivered only after the current transaction commits.
    pub fn transaction_bound(
        source: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Result<Self, EventError> {
        Self::new(source, event_type, Binding::TransactionBound)
    }

    /// Create an event with an explicit binding.
    pub fn new(
        source: impl Into<String>,
        event_type: impl Into<String>,
        binding: Binding,
    ) -> Result<Self, EventError> {
        let source = source.into();
        if source.trim().is_empty() {
            return Err(EventError::MissingSource);
        }
        let event_type = event_type.into();
        if event_type.trim().is_empty() {
            return Err(EventError::MissingEventType);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            source,
            event_type,
            binding,
            payload: Vec::new(),
            metadata: None,
            occurred_at: Utc::now(),
        })
    }

    /// Build an event from a typed [`EventKind`], taking its type tag and
    /// binding from the kind and encoding it as the payload with bitcode.
    pub fn of<K: EventKind>(source: impl Into<String>, kind: &K) -> Result<Self, EventError> {
        Self::new(source, K::EVENT_TYPE, K::BINDING)?.encode(kind)
    }

    /// Override the generated identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the raw payload bytes.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }

    /// Set a string payload.
    pub fn with_string_payload(self, payload: impl Into<String>) -> Self {
        self.with_payload(payload.into().into_bytes())
    }

    /// Add metadata to the event.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Replace the payload with the bitcode encoding of `payload`.
    pub fn encode<T: Serialize>(self, payload: &T) -> Result<Self, EventError> {
        let bytes = bitcode::serialize(payload).map_err(|source| EventError::Encode {
            event_type: self.event_type.clone(),
            source,
        })?;
        Ok(self.with_payload(bytes))
    }

    /// Decode the payload from bitcode binary format.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, EventError> {
        bitcode::deserialize(&self.payload).map_err(|source| EventError::Decode {
            event_type: self.event_type.clone(),
            source,
        })
    }

    /// Replace the payload with the JSON encoding of `payload`.
    pub fn encode_json<T: Serialize>(self, payload: &T) -> Result<Self, EventError> {
        let bytes = serde_json::to_vec(payload).map_err(|source| EventError::Json {
            event_type: self.event_type.clone(),
            source,
        })?;
        Ok(self.with_payload(bytes))
    }

    /// Decode a JSON payload.
    pub fn decode_json<T: serde::de::DeserializeOwned>(&self) -> Result<T, EventError> {
        serde_json::from_slice(&self.payload).map_err(|source| EventError::Json {
            event_type: self.event_type.clone(),
            source,
        })
    }

    /// Get the payload as a string (if valid UTF-8).
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    /// Look up a metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_transaction_bound(&self) -> bool {
        self.binding == Binding::TransactionBound
    }
}
