//! Storage backends for the overlay blob.
//!
//! An [`OverlayStorage`] is a string-keyed slot holding one serialized blob.
//! Reads are lenient: an unreadable slot is `None`, the same as an empty one.
//! Writes report failure, so a mutation never claims success for a change
//! that was not persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// A write to an [`OverlayStorage`] failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("write failed: {0}")]
    Write(String),
}

/// A named slot holding a serialized blob.
#[allow(async_fn_in_trait)]
pub trait OverlayStorage {
    /// Read the blob stored under `key`.
    async fn get(&self, key: &str) -> Option<String>;

    /// Replace the blob stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// In-memory storage for tests and native fallback.
///
/// Clones share the same slots.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with one slot.
    pub fn with_slot(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.lock() {
            slots.insert(key.into(), value.into());
        }
        storage
    }
}

impl OverlayStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slots poisoned".into()))?;
        slots.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed storage: each key is a `<key>.json` file under a root directory.
///
/// Bytes of the key outside `[A-Za-z0-9-]` are written as `_XX` (uppercase
/// hex), so distinct keys always map to distinct files.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Create a storage rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> std::path::PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("_{byte:02X}"));
            }
        }
        self.root.join(format!("{name}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl OverlayStorage for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read overlay file");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            tracing::warn!(root = %self.root.display(), error = %e, "Failed to create storage directory");
            StorageError::Unavailable(e.to_string())
        })?;

        let path = self.path_for(key);
        tokio::fs::write(&path, value).await.map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write overlay file");
            StorageError::Write(e.to_string())
        })
    }
}

/// Browser `window.localStorage`.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl OverlayStorage for LocalStorage {
    async fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let storage = Self::storage()
            .ok_or_else(|| StorageError::Unavailable("localStorage".into()))?;
        storage.set_item(key, &value).map_err(|_| {
            tracing::warn!(key, "Failed to write localStorage item");
            StorageError::Write(format!("localStorage item {key}"))
        })
    }
}
