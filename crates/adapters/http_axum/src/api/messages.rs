//! JSON REST handler for the message history.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use homesync_app::ports::{MessagePublisher, MessageStore};
use homesync_domain::alert::AlertClassification;
use homesync_domain::record::{RecordId, StoredRecord};
use homesync_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Number of records returned when no limit is given.
const DEFAULT_LIMIT: usize = 50;

/// Upper bound on the requested limit.
const MAX_LIMIT: usize = 1000;

/// Query parameters for the list endpoint.
#[derive(Deserialize)]
pub struct MessagesQuery {
    /// Maximum number of records. Defaults to 50, capped at 1000.
    pub limit: Option<usize>,
}

/// A persisted message as shown to viewers.
#[derive(Debug, Serialize)]
pub struct MessageView {
    pub id: RecordId,
    pub topic: String,
    pub payload: String,
    pub timestamp: Timestamp,
    /// Classification of telemetry records, `null` for every other topic.
    pub alert: Option<AlertClassification>,
}

impl MessageView {
    fn from_record(record: StoredRecord, telemetry_topic: &str) -> Self {
        let alert = record.alert(telemetry_topic);
        Self {
            id: record.id,
            topic: record.topic,
            payload: record.payload,
            timestamp: record.timestamp,
            alert,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    /// 200 OK with the records, newest first.
    Ok(Json<Vec<MessageView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/messages?limit=`: latest persisted messages.
pub async fn list<S, P>(
    State(state): State<AppState<S, P>>,
    Query(params): Query<MessagesQuery>,
) -> Result<ListResponse, ApiError>
where
    S: MessageStore + Send + Sync + 'static,
    P: MessagePublisher + 'static,
{
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let records = state.store.latest(limit).await?;

    let telemetry_topic = state.topics.sensor_telemetry.as_str();
    let views = records
        .into_iter()
        .map(|record| MessageView::from_record(record, telemetry_topic))
        .collect();
    Ok(ListResponse::Ok(Json(views)))
}
