//! Test doubles shared by the unit tests of this crate.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;
use homesync_domain::record::{RecordId, StoredRecord};

use crate::ports::{MessagePublisher, MessageStore};

/// Publisher that records every publication, optionally failing.
#[derive(Default)]
pub(crate) struct RecordingPublisher {
    published: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    /// Payloads published on `topic`, in order.
    pub(crate) fn on(&self, topic: &str) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub(crate) fn all(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub(crate) fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl MessagePublisher for RecordingPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HomeSyncError::publish(topic, "transport down"));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Vector-backed store, optionally failing every append.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    records: Mutex<Vec<StoredRecord>>,
    fail: AtomicBool,
}

impl InMemoryStore {
    pub(crate) fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl MessageStore for InMemoryStore {
    async fn append(&self, message: Message) -> Result<StoredRecord, HomeSyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HomeSyncError::Storage("disk unavailable".into()));
        }
        let mut records = self.records.lock().unwrap();
        let id = RecordId::new(i64::try_from(records.len()).unwrap() + 1);
        let record = StoredRecord::from_message(id, message);
        records.push(record.clone());
        Ok(record)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredRecord>, HomeSyncError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
