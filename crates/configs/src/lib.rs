use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub geoip: GeoIpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_config_file")]
    pub config_file: String,
    #[serde(default = "default_audit_log")]
    pub audit_log: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            config_file: default_config_file(),
            audit_log: default_audit_log(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoIpConfig {
    #[serde(default = "default_geoip_database")]
    pub database: String,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self { database: default_geoip_database() }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { 8089 }
fn default_data_dir() -> String { ".".into() }
fn default_config_file() -> String { "config.json".into() }
fn default_audit_log() -> String { "log.txt".into() }
fn default_geoip_database() -> String { "GeoLite2-City.mmdb".into() }

/// Path of the TOML file: `CONFIG_PATH` or `config.toml`.
pub fn config_file_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Build a config from environment variables only, used when no TOML file exists.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(v) = std::env::var("GAME_CONFIG_FILE") {
            cfg.storage.config_file = v;
        }
        if let Ok(v) = std::env::var("AUDIT_LOG_FILE") {
            cfg.storage.audit_log = v;
        }
        if let Ok(v) = std::env::var("GEOIP_DB") {
            cfg.geoip.database = v;
        }
        cfg
    }

    /// File config when present, otherwise the environment; always normalized.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_from(Path::new(&config_file_path()))
    }

    /// Only a missing file falls back to the environment; unreadable or
    /// malformed files are errors.
    pub fn load_or_env_from(path: &Path) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => parse(&content).map_err(|e| anyhow!("{}: {}", path.display(), e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => AppConfig::from_env(),
            Err(e) => return Err(anyhow!("cannot read {}: {}", path.display(), e)),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.normalize();
        self.geoip.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Path of the persisted game config map, relative to `data_dir` unless absolute.
    pub fn config_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.config_file)
    }

    /// Path of the audit log, relative to `data_dir` unless absolute.
    pub fn audit_log_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.audit_log)
    }

    fn normalize(&mut self) {
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.config_file.trim().is_empty() {
            self.config_file = default_config_file();
        }
        if self.audit_log.trim().is_empty() {
            self.audit_log = default_audit_log();
        }
    }
}

impl GeoIpConfig {
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(anyhow!("geoip.database must not be empty"));
        }
        Ok(())
    }
}
