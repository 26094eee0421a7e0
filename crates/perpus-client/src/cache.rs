//! # Session Cache
//!
//! A tiny key-value store that survives restarts. The session store keeps
//! two entries in it:
//!
//! ```text
//! "token" ──► raw bearer string
//! "user"  ──► JSON-serialized User
//! ```
//!
//! Both are written together and removed together.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Cache key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Cache key of the serialized user.
pub const USER_KEY: &str = "user";

/// Persistent string storage.
pub trait KeyValueCache: Send + Sync {
    /// Returns the stored value, `None` when the key is absent.
    fn get(&self, key: &str) -> ClientResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> ClientResult<()>;

    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

// =============================================================================
// File Cache
// =============================================================================

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> ClientResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ClientError::Cache(format!("invalid cache key: {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueCache for FileCache {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let path = self.entry_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let path = self.entry_path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, value)?;
        debug!(key, "Cache entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "Cache entry removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Cache
// =============================================================================

/// In-process cache, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ClientResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Cache("memory cache lock poisoned".into()))
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_cache_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("session"));

        assert_eq!(cache.get(TOKEN_KEY).unwrap(), None);

        cache.set(TOKEN_KEY, "abc|123").unwrap();
        assert_eq!(cache.get(TOKEN_KEY).unwrap().as_deref(), Some("abc|123"));

        cache.set(TOKEN_KEY, "def").unwrap();
        assert_eq!(cache.get(TOKEN_KEY).unwrap().as_deref(), Some("def"));

        cache.remove(TOKEN_KEY).unwrap();
        assert_eq!(cache.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_cache_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        assert!(cache.remove(USER_KEY).is_ok());
    }

    #[test]
    fn test_file_cache_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        assert!(matches!(
            cache.set("../escape", "x"),
            Err(ClientError::Cache(_))
        ));
        assert!(cache.get("").is_err());
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryCache::new();
        cache.set(USER_KEY, "{}").unwrap();
        assert_eq!(cache.get(USER_KEY).unwrap().as_deref(), Some("{}"));
        cache.remove(USER_KEY).unwrap();
        cache.remove(USER_KEY).unwrap();
        assert_eq!(cache.get(USER_KEY).unwrap(), None);
    }
}
