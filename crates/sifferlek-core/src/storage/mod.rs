//! Durable storage.
//!
//! Persistence is a key-value medium of opaque JSON strings behind the
//! [`StorageMedium`] trait: one file per key on disk in production, an
//! in-memory map in tests. Stores are explicit objects handed to their
//! consumers; reads never fail (corrupt or missing records fall back to
//! defaults), writes surface [`StorageError`].

mod config;
mod progress;
mod stickers;

pub use config::GameConfig;
pub use progress::{GameProgress, LevelStats, ProgressStore, ProgressUpdate};
pub use stickers::StickerStore;

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/sifferlek[-dev]/` based on SIFFERLEK_ENV.
///
/// Set SIFFERLEK_ENV=dev to keep development data separate.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SIFFERLEK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sifferlek-dev")
    } else {
        base_dir.join("sifferlek")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Synchronous get/set of opaque strings under fixed keys.
pub trait StorageMedium {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// File-backed medium: one `<key>.json` file per key in the data dir.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Medium rooted at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Medium rooted at an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageMedium for FileMedium {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::write(self.path(key), value).map_err(|source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }
}

/// In-memory medium for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    entries: HashMap<String, String>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryMedium {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_medium_round_trips() {
        let mut m = MemoryMedium::new();
        assert!(m.get("k").is_none());
        m.set("k", "v").unwrap();
        assert_eq!(m.get("k").as_deref(), Some("v"));
        m.remove("k");
        assert!(m.get("k").is_none());
    }

    #[test]
    fn file_medium_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = FileMedium::with_dir(dir.path());
        m.set("profile", "{\"a\":1}").unwrap();
        assert_eq!(m.get("profile").as_deref(), Some("{\"a\":1}"));
        m.remove("profile");
        assert!(m.get("profile").is_none());
    }
}
