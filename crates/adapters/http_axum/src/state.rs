//! Shared application state for axum handlers.

use std::sync::Arc;

use homesync_app::ports::{MessagePublisher, MessageStore};
use homesync_app::topics::Topics;

/// Application state shared across all axum handlers.
///
/// Generic over the store and publisher to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<S, P> {
    /// Message history.
    pub store: Arc<S>,
    /// Bus used to inject viewer commands.
    pub publisher: Arc<P>,
    /// Topic namespace, used to validate command topics.
    pub topics: Arc<Topics>,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            publisher: Arc::clone(&self.publisher),
            topics: Arc::clone(&self.topics),
        }
    }
}

impl<S, P> AppState<S, P>
where
    S: MessageStore + Send + Sync + 'static,
    P: MessagePublisher + 'static,
{
    /// Create a new application state from owned adapters.
    pub fn new(store: S, publisher: P, topics: Topics) -> Self {
        Self::from_arcs(Arc::new(store), Arc::new(publisher), Arc::new(topics))
    }

    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// Use this when the adapters are shared with background tasks.
    pub fn from_arcs(store: Arc<S>, publisher: Arc<P>, topics: Arc<Topics>) -> Self {
        Self {
            store,
            publisher,
            topics,
        }
    }
}
