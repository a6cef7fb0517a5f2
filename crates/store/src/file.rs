//! File-backed key-value store.
//!
//! The whole store is one JSON object (`{"key": "value", ...}`) loaded at
//! construction and rewritten on every `set` or `remove`, so a call that
//! returns `Ok` has already reached disk.
//!
//! Storage location: `~/.seriloka/store.json` unless configured otherwise.

use seriloka_core::error::StoreError;
use seriloka_core::store::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file starts empty and is created on the first write. A
    /// corrupted file also starts empty, with a warning. A file that exists
    /// but cannot be read is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = Self::load_from_disk(&path)?;
        debug!(path = %path.display(), keys = entries.len(), "File store loaded");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Store file is corrupted, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_error = |reason: String| StoreError::Write {
            path: self.path.display().to_string(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| write_error(format!("Failed to create store directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| write_error(e.to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.write();
        let previous = entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.write();
        let Some(old) = entries.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), old);
            return Err(e);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.get("seriloka_model").unwrap().is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("seriloka_model", "openai/gpt-4o-mini").unwrap();
        store.set("seriloka_api_key", "sk-or-test").unwrap();
        assert!(store.remove("seriloka_api_key").unwrap());
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("seriloka_model").unwrap().as_deref(),
            Some("openai/gpt-4o-mini")
        );
        assert!(reopened.get("seriloka_api_key").unwrap().is_none());
    }

    #[test]
    fn removing_missing_key_reports_false() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(!store.remove("nothing").unwrap());
        assert!(!dir.path().join("store.json").exists());
    }

    #[test]
    fn corrupted_file_starts_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ this is not json").unwrap();
        file.flush().unwrap();

        let store = FileStore::open(file.path()).unwrap();
        assert!(store.get("anything").unwrap().is_none());

        store.set("k", "v").unwrap();
        let reopened = FileStore::open(file.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        // A directory where the file should be makes every write fail.
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(store.set("k", "v"), Err(StoreError::Write { .. })));
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();

        match FileStore::open(&path) {
            Err(StoreError::Read { path: reported, .. }) => {
                assert!(reported.ends_with("store.json"));
            }
            Err(e) => panic!("expected a read error, got {e}"),
            Ok(_) => panic!("opening a directory should fail"),
        }
    }
}
