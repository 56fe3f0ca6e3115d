use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;

use crate::error::BrowseError;

/// Minimal durable string store, modeled after the key-value storage
/// available on-device. `get` and `set` are the only operations consumed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BrowseError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), BrowseError>;
}

/// Store backed by a single JSON file mapping keys to string values.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    async fn read_map(&self) -> Result<HashMap<String, String>, BrowseError> {
        match fs::read_to_string(&self.path).await {
            Ok(body) => serde_json::from_str(&body)
                .map_err(|e| BrowseError::StorageRead(format!("{}: {}", self.path.display(), e))),
            // A store that has never been written to is empty, not broken.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(BrowseError::StorageRead(format!(
                "{}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BrowseError> {
        let map = self.read_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BrowseError> {
        let mut map = self.read_map().await.unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        let body = serde_json::to_string(&map)
            .map_err(|e| BrowseError::StorageWrite(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BrowseError::StorageWrite(e.to_string()))?;
        }
        fs::write(&self.path, body)
            .await
            .map_err(|e| BrowseError::StorageWrite(format!("{}: {}", self.path.display(), e)))
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate an earlier session's writes.
    pub fn seed(self, key: &str, value: &str) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BrowseError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), BrowseError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
