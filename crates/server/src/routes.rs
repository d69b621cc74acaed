use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod games;
pub mod logs;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/get", get(games::get_config))
        .route("/set", get(games::set_open))
        .route("/reloadCfg", get(games::reload))
        .route("/showlog", get(logs::show_log))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
