//! Bundled asset access.
//!
//! The provider only needs "read this path as text". `FsAssetReader` serves
//! files from disk; `MemoryAssets` serves an in-memory map and is what the
//! tests and embedding hosts use.

use crate::error::{I18nError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Reads bundled text assets by path.
#[async_trait]
pub trait AssetReader: Send + Sync {
    /// Read the asset at `path` as UTF-8 text. Fails if the path is absent.
    async fn read_text(&self, path: &str) -> Result<String>;
}

/// Reads assets from the filesystem, optionally below a root directory.
#[derive(Debug, Clone, Default)]
pub struct FsAssetReader {
    root: Option<PathBuf>,
}

impl FsAssetReader {
    /// Resolve paths relative to the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve paths relative to `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

#[async_trait]
impl AssetReader for FsAssetReader {
    async fn read_text(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        debug!("Reading asset {}", full_path.display());

        tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|source| I18nError::AssetRead {
                path: path.to_string(),
                source,
            })
    }
}

/// In-memory asset map.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Add or replace an asset.
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
    }
}

#[async_trait]
impl AssetReader for MemoryAssets {
    async fn read_text(&self, path: &str) -> Result<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| I18nError::AssetRead {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "asset not found"),
            })
    }
}
