use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use chrono::NaiveDateTime;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::geo::{GeoLabels, GeoResolver};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One access to a gated game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub timestamp: NaiveDateTime,
    pub ip: IpAddr,
    pub country: String,
    pub city: String,
    pub game_id: String,
    pub request_path: String,
}

impl AuditLogEntry {
    /// Line as stored in the log file, newline included.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} {} {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.ip,
            self.country,
            self.city,
            self.game_id,
            self.request_path
        )
    }
}

/// Bare IP from a peer address such as `1.2.3.4:5678`, `[::1]:80` or `1.2.3.4`.
/// IPv4-mapped IPv6 addresses are reported in dotted form.
pub fn extract_ip(remote_addr: &str) -> Result<IpAddr, ServiceError> {
    let ip = match remote_addr.parse::<SocketAddr>() {
        Ok(sock) => sock.ip(),
        Err(_) => remote_addr
            .parse::<IpAddr>()
            .map_err(|_| ServiceError::InvalidAddress(remote_addr.to_string()))?,
    };
    Ok(match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    })
}

/// Appends access lines to a plain-text log file.
pub struct AuditLogger {
    path: PathBuf,
    resolver: GeoResolver,
    // serializes appends so lines never interleave
    write_lock: Mutex<()>,
}

impl AuditLogger {
    pub fn new<P: Into<PathBuf>>(path: P, resolver: GeoResolver) -> Arc<Self> {
        Arc::new(Self { path: path.into(), resolver, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Record one access. Nothing is written when the address cannot be parsed;
    /// a failed geo lookup still writes the line with empty location fields.
    pub async fn log_access(
        &self,
        remote_addr: &str,
        game_id: &str,
        request_path: &str,
        now: NaiveDateTime,
    ) -> Result<AuditLogEntry, ServiceError> {
        let ip = extract_ip(remote_addr)?;
        let labels = self.resolver.resolve(&ip.to_string()).unwrap_or_else(|e| {
            warn!(%ip, %game_id, error = %e, "geo lookup failed; logging without location");
            GeoLabels::default()
        });

        let entry = AuditLogEntry {
            timestamp: now,
            ip,
            country: labels.country,
            city: labels.city,
            game_id: game_id.to_string(),
            request_path: request_path.to_string(),
        };
        self.append(&entry.to_line()).await?;
        info!(audit = %entry, "gated game accessed");
        Ok(entry)
    }

    async fn append(&self, line: &str) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Whole log as text, for the viewer endpoint.
    pub async fn read_log(&self) -> Result<String, ServiceError> {
        Ok(fs::read_to_string(&self.path).await?)
    }
}
