use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::{ExportError, PersistenceError};
use crate::models::media_record::MediaRecord;
use crate::storage::export::{self, ExportedArtifact};
use crate::traits::durable_store::DurableStore;

/// Durable, ordered store of captured media (newest first).
///
/// The archive is the only writer of its key in the `DurableStore`. Every
/// mutation rewrites the whole collection before returning, and the lock is
/// held across the write so persisted order always matches memory.
pub struct MediaArchive {
    name: String,
    store: Arc<dyn DurableStore>,
    records: Mutex<Vec<MediaRecord>>,
}

impl MediaArchive {
    /// Open the archive stored under `name`, hydrating from `store`.
    ///
    /// Unreadable or corrupt data is logged and treated as an empty archive.
    /// A corrupt blob is first copied to [`Self::corrupt_backup_key`] so the
    /// next append does not destroy it.
    pub fn open(name: impl Into<String>, store: Arc<dyn DurableStore>) -> Self {
        let name = name.into();
        let records = match store.load(&name) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<MediaRecord>>(&json) {
                Ok(records) => {
                    log::info!("Archive '{}' hydrated with {} records", name, records.len());
                    records
                }
                Err(e) => {
                    let backup = Self::corrupt_backup_key(&name);
                    log::error!(
                        "{}; starting '{}' empty, original kept under '{}'",
                        PersistenceError::Corrupt(e.to_string()),
                        name,
                        backup
                    );
                    if let Err(e) = store.save(&backup, &json) {
                        log::error!("Failed to back up corrupt archive '{}': {}", name, e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("{}; starting '{}' empty", e, name);
                Vec::new()
            }
        };

        Self {
            name,
            store,
            records: Mutex::new(records),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key holding the last unparseable blob found under `name`.
    pub fn corrupt_backup_key(name: &str) -> String {
        format!("{}.corrupt", name)
    }

    /// Insert `record` at the head and persist.
    ///
    /// On a write failure the record stays in memory (authoritative for this
    /// session) and the error is returned as a warning for the caller.
    pub fn append(&self, record: MediaRecord) -> Result<(), PersistenceError> {
        let mut records = self.records.lock();
        log::info!("Archiving {} record {}", record.media_type, record.id);
        records.insert(0, record);
        self.persist(&records)
    }

    /// Delete the record with `id` and persist.
    ///
    /// Returns `Ok(false)` without touching storage when no record matches.
    pub fn remove(&self, id: &str) -> Result<bool, PersistenceError> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            log::debug!("Remove of unknown record {} ignored", id);
            return Ok(false);
        }
        log::info!("Removed record {}", id);
        self.persist(&records).map(|()| true)
    }

    /// Snapshot of every record, newest first.
    pub fn list(&self) -> Vec<MediaRecord> {
        self.records.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<MediaRecord> {
        self.records.lock().iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Materialise a record as a downloadable file. Does not modify the archive.
    pub fn export(&self, record: &MediaRecord) -> Result<ExportedArtifact, ExportError> {
        export::export(record)
    }

    fn persist(&self, records: &[MediaRecord]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(records).map_err(|e| PersistenceError::Serialize(e.to_string()))?;
        self.store.save(&self.name, &json).map_err(|e| {
            log::error!("Archive '{}' not persisted: {}", self.name, e);
            e
        })
    }
}

impl std::fmt::Debug for MediaArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaArchive")
            .field("name", &self.name)
            .field("records", &self.len())
            .finish()
    }
}
