use std::{path::PathBuf, sync::Arc};

use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::game_config::model::{ConfigMap, GameConfig};
use crate::storage::json_map_store::JsonMapStore;

/// File-backed store of game configs.
/// Keeps a map of `game_id -> GameConfig` persisted as pretty JSON.
pub struct ConfigStore {
    store: Arc<JsonMapStore<String, GameConfig>>,
}

impl ConfigStore {
    /// Empty store bound to the given file; call `load` to populate it.
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { store: JsonMapStore::new(path) })
    }

    /// Build the store and load it once. A failed load is logged and leaves the
    /// store empty, so the service can still start.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        let store = Self::new(path);
        if let Err(e) = store.load().await {
            warn!(path = %store.store.file_path().display(), error = %e, "initial config load failed; starting empty");
        }
        store
    }

    /// Replace the in-memory map with the persisted file.
    pub async fn load(&self) -> Result<usize, ServiceError> {
        Ok(self.load_map().await?.len())
    }

    async fn load_map(&self) -> Result<ConfigMap, ServiceError> {
        let map = self.store.load().await?;
        info!(path = %self.store.file_path().display(), games = map.len(), "config loaded");
        Ok(map)
    }

    /// Persist the whole map.
    pub async fn save(&self) -> Result<(), ServiceError> {
        self.store.save().await?;
        info!(path = %self.store.file_path().display(), "config saved");
        Ok(())
    }

    pub async fn get(&self, game_id: &str) -> Option<GameConfig> {
        self.store.get(&game_id.to_string()).await
    }

    /// Flip `isOpen` for an existing game and persist before readers see it.
    pub async fn set_open(&self, game_id: &str, open: bool) -> Result<GameConfig, ServiceError> {
        let updated = self
            .store
            .update_entry(&game_id.to_string(), |cfg| cfg.is_open = open)
            .await
            .map_err(|e| {
                warn!(%game_id, error = %e, "config save failed after toggle");
                e
            })?;
        match updated {
            Some(cfg) => {
                info!(%game_id, is_open = open, "game open flag updated");
                Ok(cfg)
            }
            None => Err(ServiceError::not_found(&format!("gameId '{}'", game_id))),
        }
    }

    /// Load from disk and return exactly the map that was loaded.
    pub async fn reload(&self) -> Result<ConfigMap, ServiceError> {
        self.load_map().await
    }

    pub async fn snapshot(&self) -> ConfigMap {
        self.store.snapshot().await
    }
}
