//! In-process bus that loops publications back to the coordinator.
//!
//! Stands in for a broker when running without network IO: every published
//! message whose topic matches one of the subscriptions is queued on the
//! inbound channel, exactly as a broker would echo it back to a subscribed
//! client.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use homesync_domain::error::HomeSyncError;
use homesync_domain::message::Message;
use homesync_domain::topic;

use crate::ports::MessagePublisher;

/// Loopback bus backed by a bounded tokio [`mpsc`] channel.
///
/// Messages on topics no subscription covers are dropped.
pub struct LoopbackBus {
    sender: mpsc::Sender<Message>,
    subscriptions: Mutex<Vec<String>>,
}

impl LoopbackBus {
    /// Create a bus with room for `capacity` undelivered messages.
    ///
    /// Returns the bus and the receiving end of the inbound stream.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let bus = Self {
            sender,
            subscriptions: Mutex::new(Vec::new()),
        };
        (bus, receiver)
    }

    /// Start delivering messages whose topic matches `filter`.
    pub fn subscribe(&self, filter: impl Into<String>) {
        let filter = filter.into();
        tracing::debug!(%filter, "loopback subscription added");
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(filter);
    }

    /// Inject a message as if it had been received from a remote publisher.
    ///
    /// # Errors
    ///
    /// Returns [`HomeSyncError::Publish`] when the inbound queue is full or
    /// the receiver is gone.
    pub fn inject(&self, message: Message) -> Result<(), HomeSyncError> {
        let topic = message.topic.clone();
        self.sender.try_send(message).map_err(|err| {
            let reason = match err {
                TrySendError::Full(_) => "loopback queue full",
                TrySendError::Closed(_) => "loopback receiver closed",
            };
            HomeSyncError::publish(topic, reason)
        })
    }

    fn is_subscribed(&self, name: &str) -> bool {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|filter| topic::matches(filter, name))
    }
}

impl MessagePublisher for LoopbackBus {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), HomeSyncError> {
        if !self.is_subscribed(topic) {
            tracing::trace!(%topic, "no loopback subscriber, dropping");
            return Ok(());
        }
        self.inject(Message::new(topic, payload))
    }
}
