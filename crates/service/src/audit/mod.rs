//! Append-only access log for gated games.

pub mod logger;

pub use logger::{extract_ip, AuditLogEntry, AuditLogger};
