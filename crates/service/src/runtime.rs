//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the data directory exists; warn on missing input files.
pub async fn ensure_env(data_dir: &str, expected_files: &[&str]) -> anyhow::Result<()> {
    common::env::ensure_env(data_dir, expected_files).await
}
