use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, OriginalUri, Query, State},
    Json,
};
use chrono::Local;
use serde::Deserialize;
use service::{
    errors::ServiceError,
    game_config::{ConfigMap, GameConfig},
};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct GetQuery {
    #[serde(rename = "gameId", default)]
    pub game_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetQuery {
    #[serde(rename = "gameId", default)]
    pub game_id: String,
    #[serde(default)]
    pub open: String,
}

/// 获取游戏配置；未开放的游戏记录访问日志
pub async fn get_config(
    State(state): State<ServerState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    Query(q): Query<GetQuery>,
) -> Result<Json<GameConfig>, ApiError> {
    let cfg = state
        .config_store
        .get(&q.game_id)
        .await
        .ok_or_else(|| ServiceError::not_found(&format!("gameId '{}'", q.game_id)))?;

    if cfg.is_gated() {
        let now = Local::now().naive_local();
        if let Err(e) = state
            .audit
            .log_access(&peer.to_string(), &q.game_id, uri.path(), now)
            .await
        {
            warn!(game_id = %q.game_id, %peer, error = %e, "audit log write failed");
        }
    }

    Ok(Json(cfg))
}

/// 设置开放开关，只有 `open=true` 视为开启
pub async fn set_open(
    State(state): State<ServerState>,
    Query(q): Query<SetQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.config_store.set_open(&q.game_id, q.open == "true").await?;
    Ok(Json(serde_json::json!({
        "message": format!("gameId '{}' isOpen set to '{}'", q.game_id, q.open),
    })))
}

/// 从磁盘重新加载并返回全部配置
pub async fn reload(State(state): State<ServerState>) -> Result<Json<ConfigMap>, ApiError> {
    let map = state.config_store.reload().await?;
    Ok(Json(map))
}
