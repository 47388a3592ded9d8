//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
#[allow(clippy::missing_errors_doc)]
pub mod messages;

use axum::Router;
use axum::routing::{get, post};

use homesync_app::ports::{MessagePublisher, MessageStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<S, P>() -> Router<AppState<S, P>>
where
    S: MessageStore + Send + Sync + 'static,
    P: MessagePublisher + 'static,
{
    Router::new()
        .route("/messages", get(messages::list::<S, P>))
        .route("/commands", post(commands::send::<S, P>))
}
