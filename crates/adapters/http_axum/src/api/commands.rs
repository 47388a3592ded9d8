//! JSON REST handler for viewer commands.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use homesync_app::ports::{MessagePublisher, MessageStore};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/commands`.
#[derive(Debug, Deserialize, Serialize)]
pub struct CommandRequest {
    /// One of the sensor control, relay control or actuator trigger topics.
    pub topic: String,
    pub payload: String,
}

/// Possible responses from the send endpoint.
pub enum SendResponse {
    /// 202 Accepted: the command was handed to the bus.
    Accepted(Json<CommandRequest>),
}

impl IntoResponse for SendResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `POST /api/commands`: publish a command onto a command topic.
///
/// The command is not applied here; it reaches the coordinator through the
/// bus like any other publisher's message.
pub async fn send<S, P>(
    State(state): State<AppState<S, P>>,
    Json(request): Json<CommandRequest>,
) -> Result<SendResponse, ApiError>
where
    S: MessageStore + Send + Sync + 'static,
    P: MessagePublisher + 'static,
{
    if !state.topics.is_command_topic(&request.topic) {
        return Err(ApiError::BadRequest(format!(
            "{} is not a command topic",
            request.topic
        )));
    }

    state.publisher.publish(&request.topic, &request.payload)?;
    tracing::info!(topic = %request.topic, "viewer command published");

    Ok(SendResponse::Accepted(Json(request)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::router::build;
    use crate::stubs::test_state;

    fn post(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/commands")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn should_publish_command_on_command_topic() {
        let (state, _, publisher) = test_state(Vec::new());

        let response = build(state)
            .oneshot(post(&serde_json::json!({
                "topic": "home/actuator/trigger",
                "payload": r#"{"command":"toggle"}"#,
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            publisher.published(),
            vec![(
                "home/actuator/trigger".to_string(),
                r#"{"command":"toggle"}"#.to_string()
            )]
        );
    }

    #[tokio::test]
    async fn should_reject_non_command_topic() {
        let (state, _, publisher) = test_state(Vec::new());

        for topic in ["home/relay/status", "home/sensor/telemetry", "elsewhere"] {
            let response = build(state.clone())
                .oneshot(post(&serde_json::json!({ "topic": topic, "payload": "on" })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{topic}");
        }
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn should_return_service_unavailable_when_publish_fails() {
        let (state, _, publisher) = test_state(Vec::new());
        publisher.set_failing();

        let response = build(state)
            .oneshot(post(&serde_json::json!({
                "topic": "home/relay/control",
                "payload": "on",
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn should_reject_malformed_body() {
        let (state, _, _) = test_state(Vec::new());

        let response = build(state)
            .oneshot(post(&serde_json::json!({ "topic": "home/relay/control" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
