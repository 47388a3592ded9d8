//! Message: an immutable observation of a payload on a topic.

use serde::{Deserialize, Serialize};

use crate::time::{Timestamp, now};

/// A payload observed on the bus.
///
/// The payload schema depends on the topic; it is kept as text and only
/// interpreted by the handler responsible for that topic. Duplicates are
/// expected and are not deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub topic: String,
    pub payload: String,
    pub observed_at: Timestamp,
}

impl Message {
    /// Create a message observed now.
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
            observed_at: now(),
        }
    }

    /// Create a message from raw transport bytes.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD so that every
    /// delivery can be persisted, even when no handler will understand it.
    /// Such payloads are therefore not stored byte for byte; see
    /// [`is_lossless_payload`](Self::is_lossless_payload).
    #[must_use]
    pub fn from_bytes(topic: impl Into<String>, payload: &[u8]) -> Self {
        Self::new(topic, String::from_utf8_lossy(payload).into_owned())
    }

    /// Whether `payload` survives [`from_bytes`](Self::from_bytes) unchanged.
    #[must_use]
    pub fn is_lossless_payload(payload: &[u8]) -> bool {
        std::str::from_utf8(payload).is_ok()
    }
}
