//! Local persistent key-value storage (the page's `localStorage`).
//!
//! Reads and writes are synchronous, like the platform store they stand in for.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::project_dirs;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Process-local store, used in tests and by hosts without persistence.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON-file backed store. The whole map is rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn default_path() -> AppResult<PathBuf> {
        project_dirs()
            .map(|dirs| dirs.data_dir().join("local_storage.json"))
            .ok_or_else(|| AppError::Storage("Unable to determine data directory".into()))
    }

    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable one is discarded with a warning, as a browser would.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&content) {
                    Ok(map) => map,
                    Err(e) => {
                        log::warn!("[Storage] Discarding unreadable store {}: {}", path.display(), e);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("Failed to create storage directory: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Storage(format!("Failed to serialize store: {}", e)))?;
        std::fs::write(&self.path, content)
            .map_err(|e| AppError::Storage(format!("Failed to write store: {}", e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    /// The change is written to disk before it becomes visible to `get`.
    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.lock().map_err(|_| AppError::Storage("store poisoned".into()))?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
