// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Local key-value storage
//
// Durable string storage keyed by name, the way a mobile app uses its
// async storage. The file backend keeps every key in one JSON object.

use crate::types::AppError;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Durable key-value backend for small string values
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Store `value` under `key`, replacing any prior value
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// File-based key-value store
pub struct FileKeyValueStore {
    file_path: PathBuf,
    // Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open the store in the platform data directory
    pub fn new() -> Result<Self, AppError> {
        Ok(Self::open(Self::get_storage_path()?))
    }

    /// Open the store backed by a specific file; the file is created on first write
    pub fn open(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Get the default path to the storage file
    fn get_storage_path() -> Result<PathBuf, AppError> {
        let data_dir = directories::ProjectDirs::from("com", "edutoyrent", "EduToyRent")
            .ok_or_else(|| AppError::Storage("Could not determine data directory".to_string()))?
            .data_dir()
            .to_path_buf();

        Ok(data_dir.join("storage.json"))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .map_err(|e| AppError::Storage(format!("Failed to read storage: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Storage(format!("Failed to parse storage: {}", e)))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("Failed to create data dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize storage: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::Storage(format!("Failed to write storage: {}", e)))?;

        Ok(())
    }
}

impl KeyValueStorage for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(AppError::Storage(e)) if self.file_path.exists() => {
                tracing::warn!("Storage file unreadable, rewriting: {}", e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        self.write_all(&entries)
    }
}

/// In-memory key-value store, lost when dropped
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
