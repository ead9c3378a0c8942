// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key/value text storage backing the record store.
//!
//! A medium holds whole serialized collections under string keys, the way a
//! browser's local storage does. Two implementations are provided:
//! - [`MemoryMedium`] keeps everything in a map (tests, ephemeral runs)
//! - [`FileMedium`] stores each key as `<dir>/<key>.json`
//!
//! Both can enforce a total byte quota across all keys.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Errors raised by a storage medium.
#[derive(Debug, thiserror::Error)]
pub enum MediumError {
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Flat key/value text storage.
pub trait StorageMedium: Send + Sync {
    /// Read the text stored under `key`, or `None` if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError>;

    /// Overwrite the text stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), MediumError>;
}

fn check_quota(quota: Option<usize>, others: usize, value: &str) -> Result<(), MediumError> {
    if let Some(quota) = quota {
        let needed = others + value.len();
        if needed > quota {
            return Err(MediumError::QuotaExceeded { needed, quota });
        }
    }
    Ok(())
}

// ─── In-Memory Medium ────────────────────────────────────────

/// In-memory medium. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    items: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a medium that rejects writes pushing total size past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    fn poisoned() -> MediumError {
        MediumError::Unavailable("memory medium lock poisoned".to_string())
    }
}

impl StorageMedium for MemoryMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        let items = self.items.read().map_err(|_| Self::poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum();
        check_quota(self.quota, others, value)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        let mut items = self.items.write().map_err(|_| Self::poisoned())?;
        items.remove(key);
        Ok(())
    }
}

// ─── File Medium ─────────────────────────────────────────────

const FILE_EXTENSION: &str = "json";

/// Directory-backed medium: one file per key.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileMedium {
    /// Open (creating if needed) a medium rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P, quota: Option<usize>) -> Result<Self, MediumError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::info!(dir = %dir.display(), quota = ?quota, "Opened file storage medium");
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, MediumError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(MediumError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }

    /// Total bytes stored under keys other than `except`.
    fn usage_excluding(&self, except: &Path) -> Result<usize, MediumError> {
        let mut total = 0usize;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path == except || path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION)
            {
                continue;
            }
            total += fs::metadata(&path)?.len() as usize;
        }
        Ok(total)
    }
}

impl StorageMedium for FileMedium {
    fn get_item(&self, key: &str) -> Result<Option<String>, MediumError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;
        if self.quota.is_some() {
            check_quota(self.quota, self.usage_excluding(&path)?, value)?;
        }

        let tmp = path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), MediumError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
