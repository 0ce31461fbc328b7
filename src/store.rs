//! Durable key-value preferences.
//!
//! The provider persists exactly one record (the saved locale), but the
//! store contract is a generic string map so hosts can back it with
//! whatever preference system they already have.

use crate::error::{I18nError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Directory name used under the platform config dir.
const APP_DIR_NAME: &str = "locale-provider";

/// File name of the default preference file.
const PREFERENCES_FILE: &str = "preferences.json";

/// String key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store, mainly for tests and hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// Every write rewrites the whole file. A missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location: `<config dir>/locale-provider/preferences.json`.
    ///
    /// # Returns
    /// `None` when the platform exposes no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(PREFERENCES_FILE))
    }

    /// Location of the preference file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the scratch file a write goes through before the rename.
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(I18nError::Store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&text).map_err(|e| {
            I18nError::Store(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Like `read_all`, but an unreadable or corrupt file reads as empty so a
    /// write can replace it.
    async fn read_all_for_write(&self) -> BTreeMap<String, String> {
        match self.read_all().await {
            Ok(values) => values,
            Err(e) => {
                warn!("Discarding unusable preference file: {}", e);
                BTreeMap::new()
            }
        }
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                I18nError::Store(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let text = serde_json::to_string_pretty(values)
            .map_err(|e| I18nError::Store(format!("failed to encode preferences: {}", e)))?;

        // Write then rename, so a crash never leaves a half-written file behind
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, text).await.map_err(|e| {
            I18nError::Store(format!("failed to write {}: {}", temp_path.display(), e))
        })?;
        tokio::fs::rename(&temp_path, &self.path).await.map_err(|e| {
            I18nError::Store(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!("Wrote {} preference(s) to {}", values.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all_for_write().await;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = match self.read_all().await {
            Ok(values) => values,
            Err(e) => {
                // A corrupt file holds no readable key; replace it with what survives
                warn!("Resetting unusable preference file: {}", e);
                return self.write_all(&BTreeMap::new()).await;
            }
        };
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}
