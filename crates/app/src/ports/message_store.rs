//! Message store port: append-only persistence of observed messages.

use std::future::Future;

use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;
use homesync_domain::record::StoredRecord;

/// Durable, append-only log of every observed [`Message`].
pub trait MessageStore {
    /// Persist a message and assign it the next sequence id.
    ///
    /// The record must be durable before this resolves successfully.
    fn append(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<StoredRecord, HomeSyncError>> + Send;

    /// Get at most `limit` records, most recent (highest sequence id) first.
    ///
    /// An empty store yields an empty vector.
    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StoredRecord>, HomeSyncError>> + Send;
}

impl<T: MessageStore + Send + Sync> MessageStore for std::sync::Arc<T> {
    fn append(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<StoredRecord, HomeSyncError>> + Send {
        (**self).append(message)
    }

    fn latest(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StoredRecord>, HomeSyncError>> + Send {
        (**self).latest(limit)
    }
}
