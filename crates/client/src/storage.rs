//! Durable key/value storage for the session.
//!
//! Only two keys exist: the bearer token and the minimal user record (JSON).
//! [`FileStore`] keeps one file per key in the state directory so a later run
//! can restore the session; [`MemoryStore`] is for tests and one-shot use.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// The fixed set of stored entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Bearer token sent on every authenticated request.
    Token,
    /// JSON of the `AuthUser` returned at login.
    User,
}

impl StorageKey {
    pub const ALL: [Self; 2] = [Self::Token, Self::User];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::User => "user",
        }
    }
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Persistent string storage keyed by [`StorageKey`].
///
/// Shared between the API client (reads the token per request) and the
/// session (writes on login, clears on logout).
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when it was never set or has been removed.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be read.
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Store a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be written.
    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backing medium cannot be written.
    fn remove(&self, key: StorageKey) -> Result<(), StorageError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` for storage. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                action: "read",
                path,
                source,
            }),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            action: "create",
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path(key);
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // The token is a credential; the file is private from creation on.
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path).map_err(|source| StorageError::Io {
            action: "write",
            path: path.clone(),
            source,
        })?;

        // `mode` only applies on creation; narrow files left by older runs.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|source| StorageError::Io {
                    action: "restrict",
                    path: path.clone(),
                    source,
                })?;
        }

        file.write_all(value.as_bytes())
            .map_err(|source| StorageError::Io {
                action: "write",
                path,
                source,
            })?;

        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                action: "remove",
                path,
                source,
            }),
        }
    }
}

/// In-process storage that is lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);

        store.set(StorageKey::Token, "abc").unwrap();
        store.set(StorageKey::User, "{\"id\":1}").unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap().as_deref(), Some("abc"));

        store.set(StorageKey::Token, "def").unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap().as_deref(), Some("def"));

        store.remove(StorageKey::Token).unwrap();
        store.remove(StorageKey::Token).unwrap();
        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        assert!(store.get(StorageKey::User).unwrap().is_some());
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        exercise(&store);
        assert!(dir.path().join("nested").join("user").exists());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path())
            .set(StorageKey::Token, "persisted")
            .unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(
            reopened.get(StorageKey::Token).unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_token_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set(StorageKey::Token, "secret").unwrap();
        let mode = fs::metadata(dir.path().join("token"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_narrows_existing_token_file() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::new(dir.path())
            .set(StorageKey::Token, "new")
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_key_names() {
        let names: Vec<_> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["token", "user"]);
    }
}
