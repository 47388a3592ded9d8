//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use homesync_domain::error::HomeSyncError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is invalid.
    BadRequest(String),
    /// An application call failed.
    Domain(HomeSyncError),
}

impl From<HomeSyncError> for ApiError {
    fn from(err: HomeSyncError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Domain(HomeSyncError::Decode(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Domain(err @ (HomeSyncError::Publish { .. } | HomeSyncError::Connection(_))) => {
                tracing::warn!(error = %err, "message bus unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            Self::Domain(HomeSyncError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_publish_failure_to_service_unavailable() {
        let err = ApiError::from(HomeSyncError::publish("home/relay/control", "queue full"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn should_map_storage_failure_to_internal_error() {
        let err = ApiError::from(HomeSyncError::Storage("disk unavailable".into()));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn should_map_bad_request_to_400() {
        let err = ApiError::BadRequest("nope".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
