//! Port stubs shared by the handler tests.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};

use homesync_app::ports::{MessagePublisher, MessageStore};
use homesync_app::topics::Topics;
use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;
use homesync_domain::record::{RecordId, StoredRecord};

use crate::state::AppState;

#[derive(Default)]
pub(crate) struct StubStore {
    records: Mutex<Vec<StoredRecord>>,
    fail: AtomicBool,
}

impl StubStore {
    pub(crate) fn set_failing(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl MessageStore for StubStore {
    async fn append(&self, message: Message) -> Result<StoredRecord, HomeSyncError> {
        let mut records = self.records.lock().unwrap();
        let id = RecordId::new(i64::try_from(records.len()).unwrap() + 1);
        let record = StoredRecord::from_message(id, message);
        records.push(record.clone());
        Ok(record)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<StoredRecord>, HomeSyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HomeSyncError::Storage("disk unavailable".into()));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}

#[derive(Default)]
pub(crate) struct StubPublisher {
    published: Mutex<Vec<(String, String)>>,
    fail: AtomicBool,
}

impl StubPublisher {
    pub(crate) fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub(crate) fn set_failing(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

impl MessagePublisher for StubPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HomeSyncError::publish(topic, "bus disconnected"));
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

/// State over stubs, with the store pre-filled with `messages` in order.
pub(crate) fn test_state(
    messages: Vec<Message>,
) -> (
    AppState<StubStore, StubPublisher>,
    Arc<StubStore>,
    Arc<StubPublisher>,
) {
    let store = StubStore::default();
    {
        let mut records = store.records.lock().unwrap();
        for (idx, message) in messages.into_iter().enumerate() {
            let id = RecordId::new(i64::try_from(idx).unwrap() + 1);
            records.push(StoredRecord::from_message(id, message));
        }
    }
    let store = Arc::new(store);
    let publisher = Arc::new(StubPublisher::default());
    let state = AppState::from_arcs(
        Arc::clone(&store),
        Arc::clone(&publisher),
        Arc::new(Topics::default()),
    );
    (state, store, publisher)
}
