//! Scoped key-value storage for persisted preferences
//!
//! The controller keeps two plain strings across restarts: the language
//! preference and the server-assigned session id. Storage failures are logged
//! and never interrupt the conversation.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Key holding the language preference
pub const LANGUAGE_KEY: &str = "pgrkam_language";
/// Key holding the server-assigned session id
pub const SESSION_KEY: &str = "pgrkam_session_id";

/// Get/set/remove by string key
pub trait ScopedStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Storage that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScopedStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// Storage backed by a JSON object in a single file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Default location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pgrkam")
            .join("storage.json")
    }

    /// Open (or lazily create) a storage file.
    ///
    /// A missing file starts empty; an unreadable or corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> crate::error::Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open a storage file, falling back to an empty store if it is corrupt
    pub fn open_or_reset(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!("Ignoring unreadable storage file {}: {}", path.display(), e);
                Self {
                    path,
                    entries: Mutex::new(HashMap::new()),
                }
            }
        }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &HashMap<String, String>) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
                #[cfg(unix)]
                fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;

        #[cfg(unix)]
        fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Err(e) = self.save(entries) {
            tracing::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

impl ScopedStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        if entries.get(key).map(String::as_str) == Some(value) {
            return;
        }
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("pgrkam-storage-test-{}-{}", std::process::id(), name))
            .join("storage.json")
    }

    #[test]
    fn test_memory_storage_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(LANGUAGE_KEY), None);
        storage.set(LANGUAGE_KEY, "pa");
        assert_eq!(storage.get(LANGUAGE_KEY).as_deref(), Some("pa"));
        storage.remove(LANGUAGE_KEY);
        assert_eq!(storage.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let path = temp_path("reopen");
        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set(LANGUAGE_KEY, "pa");
            storage.set(SESSION_KEY, "abc123");
            storage.remove(SESSION_KEY);
            storage.set(SESSION_KEY, "def456");
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("pa"));
        assert_eq!(reopened.get(SESSION_KEY).as_deref(), Some("def456"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let path = temp_path("missing");
        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get(SESSION_KEY), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_resets() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();

        assert!(FileStorage::open(&path).is_err());
        let storage = FileStorage::open_or_reset(&path);
        assert_eq!(storage.get(LANGUAGE_KEY), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_permissions_are_private() {
        let path = temp_path("perms");
        let storage = FileStorage::open(&path).unwrap();
        storage.set(SESSION_KEY, "abc123");

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
