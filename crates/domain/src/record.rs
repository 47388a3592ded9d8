//! Stored record: the durable, append-only form of a [`Message`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alert::AlertClassification;
use crate::message::Message;
use crate::time::Timestamp;

/// Insertion sequence number assigned by the store.
///
/// Strictly increasing in insertion order; `latest` queries order by it,
/// never by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub topic: String,
    pub payload: String,
    pub timestamp: Timestamp,
}

impl StoredRecord {
    /// Attach a sequence id to an observed message.
    #[must_use]
    pub fn from_message(id: RecordId, message: Message) -> Self {
        Self {
            id,
            topic: message.topic,
            payload: message.payload,
            timestamp: message.observed_at,
        }
    }

    /// Re-evaluate the alert classification of a telemetry record.
    ///
    /// Returns `None` for records on other topics and for telemetry payloads
    /// that carry no numeric temperature.
    #[must_use]
    pub fn alert(&self, telemetry_topic: &str) -> Option<AlertClassification> {
        if self.topic != telemetry_topic {
            return None;
        }
        AlertClassification::classify_payload(&self.payload)
            .ok()
            .map(|(_, alert)| alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TELEMETRY: &str = "home/sensor/telemetry";

    fn record(topic: &str, payload: &str) -> StoredRecord {
        StoredRecord::from_message(RecordId::new(1), Message::new(topic, payload))
    }

    #[test]
    fn should_keep_message_fields() {
        let message = Message::new("home/relay/status", "on");
        let observed_at = message.observed_at;
        let rec = StoredRecord::from_message(RecordId::new(7), message);
        assert_eq!(rec.id.as_i64(), 7);
        assert_eq!(rec.payload, "on");
        assert_eq!(rec.timestamp, observed_at);
    }

    #[test]
    fn should_reevaluate_alert_for_telemetry_record() {
        let rec = record(TELEMETRY, r#"{"temperature": 34.1, "humidity": 50}"#);
        assert_eq!(rec.alert(TELEMETRY), Some(AlertClassification::HighTemperature));
    }

    #[test]
    fn should_not_evaluate_other_topics() {
        let rec = record("home/relay/status", r#"{"temperature": 34.1}"#);
        assert_eq!(rec.alert(TELEMETRY), None);
    }

    #[test]
    fn should_skip_malformed_telemetry() {
        let rec = record(TELEMETRY, "garbage");
        assert_eq!(rec.alert(TELEMETRY), None);
    }

    #[test]
    fn should_order_ids_by_sequence() {
        assert!(RecordId::new(2) > RecordId::new(1));
    }
}
