//! Message bus port: fire-and-forget publication onto a topic.

use homesync_domain::error::HomeSyncError;

/// Hands messages to the bus transport.
///
/// Publication is fire-and-forget: implementations enqueue the message and
/// return without waiting for any acknowledgement, so callers may publish
/// while holding a state lock.
pub trait MessagePublisher: Send + Sync {
    /// Enqueue `payload` for publication on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSyncError::Publish`] when the transport refuses the
    /// message (disconnected, queue full). Failures are not retried.
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError>;
}

impl<T: MessagePublisher + ?Sized> MessagePublisher for std::sync::Arc<T> {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError> {
        (**self).publish(topic, payload)
    }
}
