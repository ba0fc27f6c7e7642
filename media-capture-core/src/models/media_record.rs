use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ExportError;

/// Kind of captured artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl MediaType {
    /// File extension used when exporting.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image => "png",
            Self::Video => "webm",
            Self::Audio => "wav",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-contained encoded payload: an RFC 2397 data URL
/// (`data:<mime>;base64,<bytes>`).
///
/// Stored verbatim, so a payload read back from storage is byte-identical to
/// the one written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaPayload(String);

impl MediaPayload {
    /// Encode raw bytes. Codec parameters (`;codecs=...`) are stripped from
    /// the mime, since their commas would break the data URL.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "data:{};base64,{}",
            base_mime(mime_type),
            BASE64_STANDARD.encode(bytes)
        ))
    }

    /// Wrap an already-encoded data URL without validating it.
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mime declared in the data URL header, if the payload is well formed.
    pub fn mime_type(&self) -> Option<&str> {
        let (header, _) = self.split()?;
        let mime = header.split(';').next().unwrap_or_default();
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }

    /// Decode the payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ExportError> {
        let (header, body) = self
            .split()
            .ok_or_else(|| ExportError::InvalidPayload("not a data URL".into()))?;

        if header.ends_with(";base64") {
            BASE64_STANDARD
                .decode(body)
                .map_err(|e| ExportError::InvalidPayload(format!("bad base64: {}", e)))
        } else {
            Ok(body.as_bytes().to_vec())
        }
    }

    /// Header and body of the data URL. Base64 bodies never contain a comma,
    /// so codec lists in the header (`codecs=vp9,opus`) stay in the header.
    fn split(&self) -> Option<(&str, &str)> {
        let rest = self.0.strip_prefix("data:")?;
        match rest.find(";base64,") {
            Some(at) => Some((&rest[..at + ";base64".len()], &rest[at + ";base64,".len()..])),
            None => rest.split_once(','),
        }
    }
}

/// `video/webm;codecs=vp9,opus` → `video/webm`.
pub fn base_mime(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or(mime_type).trim()
}

/// A captured artifact as stored in the archive.
///
/// Field names match the persisted layout:
/// `{id, type, data, timestamp, duration?, thumbnail?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,

    #[serde(rename = "type")]
    pub media_type: MediaType,

    pub data: MediaPayload,

    /// RFC 3339 capture time. Older archives may hold free-form strings,
    /// which are preserved as-is.
    pub timestamp: String,

    /// Recording length in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<MediaPayload>,
}

impl MediaRecord {
    /// New record stamped with the current time and a fresh time-derived id.
    pub fn new(media_type: MediaType, data: MediaPayload) -> Self {
        let now = Utc::now();
        Self {
            id: time_derived_id(&now),
            media_type,
            data,
            timestamp: now.to_rfc3339(),
            duration: None,
            thumbnail: None,
        }
    }

    pub fn with_duration(mut self, duration_secs: f64) -> Self {
        self.duration = Some(duration_secs);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: MediaPayload) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Parsed capture time, or `None` for timestamps that are not RFC 3339.
    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// `<unix millis>-<8 hex chars>`: sortable by time, unique within a millisecond.
fn time_derived_id(now: &DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", now.timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_strips_codec_parameters() {
        let payload = MediaPayload::encode("video/webm;codecs=vp9,opus", b"abc");
        assert_eq!(payload.as_str(), "data:video/webm;base64,YWJj");
        assert_eq!(payload.mime_type(), Some("video/webm"));
    }

    #[test]
    fn payload_decodes_back_to_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let payload = MediaPayload::encode("image/png", &bytes);
        assert_eq!(payload.decode().unwrap(), bytes);
    }

    #[test]
    fn codec_list_in_header_does_not_split_body() {
        let payload = MediaPayload::from_data_url("data:video/webm;codecs=vp9,opus;base64,GkXfow==");
        assert_eq!(payload.decode().unwrap(), vec![0x1a, 0x45, 0xdf, 0xa3]);
        assert_eq!(payload.mime_type(), Some("video/webm"));
    }

    #[test]
    fn non_base64_data_url_decodes_verbatim() {
        let payload = MediaPayload::from_data_url("data:text/plain,hello");
        assert_eq!(payload.decode().unwrap(), b"hello");
        assert_eq!(payload.mime_type(), Some("text/plain"));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let payload = MediaPayload::from_data_url("blob:https://example/1234");
        assert!(matches!(payload.decode(), Err(ExportError::InvalidPayload(_))));
        assert_eq!(payload.mime_type(), None);

        let bad_base64 = MediaPayload::from_data_url("data:image/png;base64,@@@");
        assert!(bad_base64.decode().is_err());
    }

    #[test]
    fn record_serializes_to_persisted_layout() {
        let record = MediaRecord {
            id: "1700000000000-deadbeef".into(),
            media_type: MediaType::Video,
            data: MediaPayload::from_data_url("data:video/webm;base64,AA=="),
            timestamp: "2026-10-19T08:00:00+00:00".into(),
            duration: Some(2.5),
            thumbnail: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(json["data"], "data:video/webm;base64,AA==");
        assert_eq!(json["duration"], 2.5);
        assert!(json.get("thumbnail").is_none());
    }

    #[test]
    fn record_without_duration_parses() {
        let json = r#"{"id":"1","type":"image","data":"data:image/png;base64,AA==","timestamp":"10/19/2026, 8:00:00 AM"}"#;
        let record: MediaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.media_type, MediaType::Image);
        assert_eq!(record.duration, None);
        assert_eq!(record.captured_at(), None);
        assert_eq!(record.timestamp, "10/19/2026, 8:00:00 AM");
    }

    #[test]
    fn new_record_has_time_derived_id_and_rfc3339_timestamp() {
        let before = Utc::now().timestamp_millis();
        let record = MediaRecord::new(MediaType::Audio, MediaPayload::encode("audio/webm", b"x"));
        let (millis, suffix) = record.id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() >= before);
        assert_eq!(suffix.len(), 8);
        assert!(record.captured_at().unwrap() <= Utc::now());
    }

    #[test]
    fn ids_are_unique_within_a_millisecond() {
        let a = MediaRecord::new(MediaType::Image, MediaPayload::encode("image/png", b""));
        let b = MediaRecord::new(MediaType::Image, MediaPayload::encode("image/png", b""));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn extensions_follow_media_type() {
        assert_eq!(MediaType::Image.extension(), "png");
        assert_eq!(MediaType::Video.extension(), "webm");
        assert_eq!(MediaType::Audio.extension(), "wav");
    }
}
