use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::{
    audit::AuditLogger,
    game_config::ConfigStore,
    geo::{GeoLookup, GeoResolver, MaxmindLookup},
    runtime,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Construct the config store and audit logger from configuration.
/// The config map is loaded once; a failed load leaves it empty.
pub async fn build_state(cfg: &AppConfig, lookup: Arc<dyn GeoLookup>) -> ServerState {
    let config_store = ConfigStore::open(cfg.storage.config_path()).await;
    let audit = AuditLogger::new(cfg.storage.audit_log_path(), GeoResolver::new(lookup));
    ServerState { config_store, audit }
}

/// Serve `app` on `listener`, exposing peer addresses to handlers.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

/// Build the app from an already loaded configuration and serve it.
/// Logging and `.env` are set up by the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let config_path = cfg.storage.config_path();
    let config_file = config_path.to_string_lossy().to_string();
    runtime::ensure_env(&cfg.storage.data_dir, &[config_file.as_str(), cfg.geoip.database.as_str()]).await?;

    // 打不开 IP 库时无法审计，直接终止启动
    let lookup = Arc::new(MaxmindLookup::open(&cfg.geoip.database)?);
    let state = build_state(&cfg, lookup).await;

    let app = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, config = %config_path.display(), "starting game config server");
    let listener = TcpListener::bind(addr).await?;
    serve(listener, app).await
}
