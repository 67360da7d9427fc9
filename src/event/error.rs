use thiserror::Error;

/// Error type for building events and encoding/decoding their payloads.
#[derive(Debug, Error)]
pub enum EventError {
    /// Every event must name the component that raised it.
    #[error("event source must not be empty")]
    MissingSource,
    /// Listeners match on the event type, so it cannot be blank.
    #[error("event type must not be empty")]
    MissingEventType,
    #[error("failed to encode payload for {event_type}: {source}")]
    Encode {
        event_type: String,
        #[source]
        source: bitcode::Error,
    },
    #[error("failed to decode payload of {event_type}: {source}")]
    Decode {
        event_type: String,
        #[source]
        source: bitcode::Error,
    },
    #[error("json payload error for {event_type}: {source}")]
    Json {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}
