use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::models::capture_result::sha256_hex;
use crate::models::error::ExportError;
use crate::models::media_record::{MediaRecord, MediaType};

/// A stored record materialised as a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    /// `capture-<type>-<unix millis>.<ext>`
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// SHA-256 hex digest of `bytes`.
    pub checksum: String,
}

impl ExportedArtifact {
    /// Write the artifact into `directory`, creating it if needed.
    pub fn write_to(&self, directory: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(directory)
            .map_err(|e| ExportError::Io(format!("failed to create directory: {}", e)))?;
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.bytes)
            .map_err(|e| ExportError::Io(format!("failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}

/// Decode a record's payload into a downloadable artifact. Pure read.
pub fn export(record: &MediaRecord) -> Result<ExportedArtifact, ExportError> {
    export_at(record, Utc::now())
}

pub(crate) fn export_at(record: &MediaRecord, at: DateTime<Utc>) -> Result<ExportedArtifact, ExportError> {
    let bytes = record.data.decode()?;
    let mime_type = record
        .data
        .mime_type()
        .map(str::to_string)
        .unwrap_or_else(|| default_mime(record.media_type).to_string());

    Ok(ExportedArtifact {
        file_name: export_file_name(record.media_type, at),
        mime_type,
        checksum: sha256_hex(&bytes),
        bytes,
    })
}

pub fn export_file_name(media_type: MediaType, at: DateTime<Utc>) -> String {
    format!(
        "capture-{}-{}.{}",
        media_type,
        at.timestamp_millis(),
        media_type.extension()
    )
}

fn default_mime(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Image => "image/png",
        MediaType::Video => "video/webm",
        MediaType::Audio => "audio/wav",
    }
}
