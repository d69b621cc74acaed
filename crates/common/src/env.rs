//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected files and directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the data directory exists; warn when an expected input file is missing.
pub async fn ensure_env(data_dir: &str, expected_files: &[&str]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    for file in expected_files {
        if tokio::fs::metadata(Path::new(file)).await.is_err() {
            warn!(%file, "expected file not found");
        }
    }
    Ok(())
}
