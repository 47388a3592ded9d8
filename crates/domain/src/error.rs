//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HomeSyncError`] at the port boundary.

use std::error::Error;

/// Boxed infrastructure error carried across port boundaries.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Top-level error taxonomy of the coordination core.
#[derive(Debug, thiserror::Error)]
pub enum HomeSyncError {
    /// The message bus could not be reached.
    #[error("message bus unreachable")]
    Connection(#[source] BoxError),

    /// A message could not be handed to the transport.
    #[error("failed to publish on {topic}")]
    Publish {
        topic: String,
        #[source]
        source: BoxError,
    },

    /// The store could not durably append or read records.
    #[error("storage error")]
    Storage(#[source] BoxError),

    /// A payload could not be interpreted for its topic.
    #[error("decode error")]
    Decode(#[from] DecodeError),
}

impl HomeSyncError {
    /// Build a [`HomeSyncError::Publish`] for `topic`.
    pub fn publish(topic: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Publish {
            topic: topic.into(),
            source: source.into(),
        }
    }
}

/// Reasons a payload is not a recognised command or reading.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not one of the tokens accepted on this topic.
    #[error("unrecognized payload {payload:?}")]
    UnknownToken { payload: String },

    /// The numeric suffix of a `temp:` override is not a finite number.
    #[error("invalid temperature override {value:?}")]
    InvalidTemperature { value: String },

    /// A structured payload is not valid JSON or has the wrong shape.
    #[error("malformed JSON payload")]
    Json(#[from] serde_json::Error),

    /// A structured payload lacks a required field.
    #[error("missing field {field}")]
    MissingField { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_publish_error_with_topic() {
        let err = HomeSyncError::publish("home/relay/status", "queue full");
        assert_eq!(err.to_string(), "failed to publish on home/relay/status");
        assert!(err.source().is_some());
    }

    #[test]
    fn should_convert_decode_error_into_homesync_error() {
        let err: HomeSyncError = DecodeError::MissingField {
            field: "temperature",
        }
        .into();
        assert!(matches!(err, HomeSyncError::Decode(_)));
    }

    #[test]
    fn should_display_unknown_token_with_payload() {
        let err = DecodeError::UnknownToken {
            payload: "blink".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized payload \"blink\"");
    }
}
