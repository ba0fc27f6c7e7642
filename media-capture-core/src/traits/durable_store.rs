use crate::models::error::PersistenceError;

/// Process-wide key/value storage for archives.
///
/// Each key is written by exactly one `MediaArchive`.
pub trait DurableStore: Send + Sync {
    /// Stored value for `key`, or `None` if nothing was ever written.
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value for `key`. Durable once this returns `Ok`.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}
