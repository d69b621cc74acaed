use std::sync::Arc;

use service::{audit::AuditLogger, game_config::ConfigStore};

/// Shared handler state; both stores are constructed once at startup.
#[derive(Clone)]
pub struct ServerState {
    pub config_store: Arc<ConfigStore>,
    pub audit: Arc<AuditLogger>,
}
