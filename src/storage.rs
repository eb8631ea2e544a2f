//! [`StateStorage`] backends.
//!
//! [`FileStorage`] keeps one JSON file per key inside a directory and is
//! what the daemon uses.  [`MemoryStorage`] keeps everything in process and
//! is meant for tests and for embedders that persist elsewhere.

use crate::traits::StateStorage;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Errors produced by the storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory is created on the first write.  Writes go to a temporary
/// sibling file that is then renamed over the target, so readers never see
/// a half-written document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// File path backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StateStorage for FileStorage {
    type Error = StorageError;

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: io::Error| StorageError::Io { path, source }
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_err(&path))?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `key`, e.g. with a document written by an older build.
    pub fn with_value(key: &str, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.values.borrow_mut().insert(key.to_string(), value.into());
        storage
    }
}

impl StateStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.read("state").unwrap(), None);
    }

    #[test]
    fn file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        storage.write("state", r#"{"version":2}"#).unwrap();
        assert_eq!(storage.read("state").unwrap().as_deref(), Some(r#"{"version":2}"#));
        assert!(dir.path().join("nested").join("state.json").exists());
        assert!(!dir.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn file_storage_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write("k", "one").unwrap();
        storage.write("k", "two").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn file_storage_rejects_path_like_keys() {
        let storage = FileStorage::new("/tmp");
        for key in ["", "../etc/passwd", "a/b", ".hidden"] {
            assert!(
                matches!(storage.path_for(key), Err(StorageError::InvalidKey(_))),
                "{:?} accepted",
                key
            );
        }
        assert!(storage.path_for("newsgrid-state").is_ok());
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::with_value("a", "1");
        assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.read("b").unwrap(), None);
        storage.write("b", "2").unwrap();
        assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));
    }
}
