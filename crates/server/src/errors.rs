use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

/// JSON error response: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::new(StatusCode::NOT_FOUND, e.to_string()),
            ServiceError::InvalidAddress(_) => ApiError::new(StatusCode::BAD_REQUEST, e.to_string()),
            ServiceError::Io(_) | ServiceError::Parse(_) | ServiceError::Resolution(_) => {
                // details stay in the operational log
                error!(error = %e, "request failed");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal storage error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_message() {
        let err: ApiError = ServiceError::not_found("gameId 'x'").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "gameId 'x' not found");
    }

    #[test]
    fn storage_errors_are_generic() {
        let err: ApiError = ServiceError::Io("disk full at /srv/config.json".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("/srv"));
        let err: ApiError = ServiceError::Parse("expected value".into()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
