use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::state::ServerState;

/// Audit log as plain text.
pub async fn show_log(State(state): State<ServerState>) -> Response {
    match state.audit.read_log().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(path = %state.audit.path().display(), error = %e, "reading audit log failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Error reading log file"})),
            )
                .into_response()
        }
    }
}
