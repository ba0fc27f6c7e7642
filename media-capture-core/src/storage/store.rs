use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::PersistenceError;
use crate::traits::durable_store::DurableStore;

/// Directory-backed store: each key lives in `<directory>/<key>.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl DurableStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read(format!("{}: {}", path.display(), e))),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| PersistenceError::Write(format!("failed to create directory: {}", e)))?;

        let path = self.path_for(key);
        let tmp_path = self.directory.join(format!("{}.json.tmp", key));
        fs::write(&tmp_path, value)
            .map_err(|e| PersistenceError::Write(format!("{}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| PersistenceError::Write(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// In-memory store. Clones share the same entries, so an archive can be
/// "restarted" against the same storage in tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
