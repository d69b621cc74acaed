use std::{collections::BTreeMap, ffi::OsString, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Keeps a `BTreeMap<K, V>` behind a single lock and mirrors it to a JSON file.
/// Keys are sorted, so the file is stable and diffable between saves.
pub struct JsonMapStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Ord + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Create an empty store bound to `path`. Nothing is read until `load`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(BTreeMap::new()), file_path: path.into() })
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }

    /// Replace the in-memory map with the file contents and return a copy of
    /// what was loaded, taken under the same guard. On read or parse failure
    /// the current map is kept.
    pub async fn load(&self) -> Result<BTreeMap<K, V>, ServiceError> {
        let mut map = self.inner.write().await;
        let bytes = fs::read(&self.file_path).await?;
        let loaded: BTreeMap<K, V> =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::Parse(e.to_string()))?;
        *map = loaded;
        debug!(path = %self.file_path.display(), entries = map.len(), "map loaded");
        Ok(map.clone())
    }

    /// Write the full map to disk.
    pub async fn save(&self) -> Result<(), ServiceError> {
        let map = self.inner.write().await;
        self.persist(&map).await
    }

    // Write-to-temp then rename, so the target is either the old or the new file.
    async fn persist(&self, map: &BTreeMap<K, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(|e| ServiceError::Parse(e.to_string()))?;
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &self.file_path).await?;
        debug!(path = %self.file_path.display(), entries = map.len(), "map saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.file_path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Copy of the whole map.
    pub async fn snapshot(&self) -> BTreeMap<K, V> {
        self.inner.read().await.clone()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Copy the entry for `key`, apply `f` to the copy, store it back and persist,
    /// all under the write lock. Returns `Ok(None)` without touching disk when
    /// the key is absent.
    pub async fn update_entry<F>(&self, key: &K, f: F) -> Result<Option<V>, ServiceError>
    where
        F: FnOnce(&mut V),
    {
        let mut map = self.inner.write().await;
        let Some(mut value) = map.get(key).cloned() else {
            return Ok(None);
        };
        f(&mut value);
        map.insert(key.clone(), value.clone());
        self.persist(&map).await?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", prefix, uuid::Uuid::new_v4()))
    }

    async fn seeded(prefix: &str, json: &str) -> Result<(PathBuf, Arc<JsonMapStore<String, String>>), anyhow::Error> {
        let tmp = tmp_path(prefix);
        tokio::fs::write(&tmp, json).await?;
        let store = JsonMapStore::<String, String>::new(&tmp);
        store.load().await?;
        Ok((tmp, store))
    }

    #[tokio::test]
    async fn json_map_store_update_persists() -> Result<(), anyhow::Error> {
        let (tmp, store) = seeded("json_map_store", r#"{"b":"2","a":"1"}"#).await?;

        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));
        let keys: Vec<String> = store.snapshot().await.into_keys().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        // update_entry
        let updated = store.update_entry(&"a".to_string(), |v| *v = "10".into()).await?;
        assert_eq!(updated.as_deref(), Some("10"));
        assert_eq!(store.update_entry(&"zz".to_string(), |v| *v = "x".into()).await?, None);

        // reload persistence
        let reloaded = JsonMapStore::<String, String>::new(&tmp);
        let loaded = reloaded.load().await?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded, store.snapshot().await);
        assert_eq!(reloaded.get(&"a".into()).await.as_deref(), Some("10"));
        assert_eq!(reloaded.get(&"zz".into()).await, None);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn saved_file_is_pretty_and_sorted() -> Result<(), anyhow::Error> {
        let (tmp, store) = seeded("json_map_store_pretty", r#"{"zeta":"2","alpha":"1"}"#).await?;
        store.save().await?;

        let text = tokio::fs::read_to_string(&tmp).await?;
        assert_eq!(text, "{\n  \"alpha\": \"1\",\n  \"zeta\": \"2\"\n}");
        assert!(tokio::fs::metadata(store.temp_path()).await.is_err());

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_load_keeps_current_map() -> Result<(), anyhow::Error> {
        let (tmp, store) = seeded("json_map_store_broken", r#"{"a":"1"}"#).await?;

        tokio::fs::write(&tmp, b"{ not json").await?;
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));

        tokio::fs::remove_file(&tmp).await?;
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        assert_eq!(store.snapshot().await.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn failed_persist_keeps_update_in_memory() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("json_map_store_dir_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("map.json");
        tokio::fs::write(&path, r#"{"a":"1"}"#).await?;
        let store = JsonMapStore::<String, String>::new(&path);
        store.load().await?;

        // parent directory replaced by a regular file
        tokio::fs::remove_dir_all(&dir).await?;
        tokio::fs::write(&dir, b"blocker").await?;

        let err = store.update_entry(&"a".to_string(), |v| *v = "2".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("2"));
        assert!(matches!(store.save().await, Err(ServiceError::Io(_))));

        let _ = tokio::fs::remove_file(&dir).await;
        Ok(())
    }
}
