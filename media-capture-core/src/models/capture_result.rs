use sha2::{Digest, Sha256};

use super::error::PersistenceError;
use super::media_record::MediaRecord;

/// Result returned when a photo or recording has been captured and handed
/// to the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureResult {
    pub record: MediaRecord,

    /// SHA-256 hex digest of the encoded artifact bytes.
    pub checksum: String,

    /// Set when the archive kept the record in memory but could not write it
    /// to durable storage. The record may not survive a restart.
    pub persistence_warning: Option<PersistenceError>,
}

impl CaptureResult {
    pub fn is_persisted(&self) -> bool {
        self.persistence_warning.is_none()
    }
}

/// SHA-256 hex digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_of_abc() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
