use serde::{Deserialize, Serialize};

use super::error::AcquisitionError;

/// Target frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const UHD_4K: Resolution = Resolution::new(3840, 2160);
    pub const FULL_HD: Resolution = Resolution::new(1920, 1080);
    pub const HD: Resolution = Resolution::new(1280, 720);
    pub const SD: Resolution = Resolution::new(854, 480);

    /// Presets offered in the settings panel, largest first.
    pub const PRESETS: [Resolution; 4] = [Self::UHD_4K, Self::FULL_HD, Self::HD, Self::SD];

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::FULL_HD
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Frame rates offered in the settings panel.
pub const FRAME_RATE_PRESETS: [u32; 3] = [60, 30, 24];

/// Which tracks a stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Camera plus microphone (video recording).
    VideoWithAudio,
    /// Camera only (photos).
    #[default]
    VideoOnly,
    /// Microphone only (audio recording).
    AudioOnly,
}

impl CaptureMode {
    pub fn has_video(&self) -> bool {
        !matches!(self, Self::AudioOnly)
    }

    pub fn has_audio(&self) -> bool {
        !matches!(self, Self::VideoOnly)
    }
}

/// Desired stream parameters, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Pinned camera, or `None` for any camera.
    pub device_id: Option<String>,
    pub resolution: Resolution,
    pub frame_rate: u32,
    pub mode: CaptureMode,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            resolution: Resolution::FULL_HD,
            frame_rate: 30,
            mode: CaptureMode::VideoOnly,
        }
    }
}

impl StreamConfig {
    pub fn new(resolution: Resolution, frame_rate: u32, mode: CaptureMode) -> Self {
        Self {
            device_id: None,
            resolution,
            frame_rate,
            mode,
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Every settings-panel combination for `mode`, largest and fastest first.
    pub fn presets(mode: CaptureMode) -> impl Iterator<Item = StreamConfig> {
        Resolution::PRESETS.into_iter().flat_map(move |resolution| {
            FRAME_RATE_PRESETS
                .into_iter()
                .map(move |frame_rate| StreamConfig::new(resolution, frame_rate, mode))
        })
    }

    /// Whether the resolution and frame rate are both offered in the settings panel.
    pub fn is_preset(&self) -> bool {
        Resolution::PRESETS.contains(&self.resolution) && FRAME_RATE_PRESETS.contains(&self.frame_rate)
    }

    /// Check the config against the latest enumerated device ids.
    ///
    /// Audio-only streams ignore the video settings entirely.
    pub fn validate<'a>(
        &self,
        known_devices: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), AcquisitionError> {
        if !self.mode.has_video() {
            return Ok(());
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(AcquisitionError::ConstraintsUnsatisfiable(format!(
                "invalid resolution {}",
                self.resolution
            )));
        }
        if self.frame_rate == 0 {
            return Err(AcquisitionError::ConstraintsUnsatisfiable(
                "frame rate must be positive".into(),
            ));
        }
        if let Some(ref id) = self.device_id {
            if !known_devices.into_iter().any(|known| known == id) {
                return Err(AcquisitionError::DeviceUnavailable(id.clone()));
            }
        }
        Ok(())
    }

    /// Host-facing constraints for this config.
    pub fn constraints(&self) -> MediaConstraints {
        let video = self.mode.has_video().then(|| VideoConstraints {
            exact_device_id: self.device_id.clone(),
            ideal_width: self.resolution.width,
            ideal_height: self.resolution.height,
            ideal_frame_rate: self.frame_rate,
        });
        MediaConstraints {
            video,
            audio: self.mode.has_audio(),
        }
    }
}

/// Video part of an acquisition request. Sizes and rates are "ideal": the
/// host may deliver something close to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub exact_device_id: Option<String>,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_frame_rate: u32,
}

/// What a `CaptureHost` is asked to acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConstraints {
    pub video: Option<VideoConstraints>,
    pub audio: bool,
}

/// Settings for a capture surface and its archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfiguration {
    /// Key of the archive in durable storage (default: "capturedMedia").
    pub archive_name: String,

    /// Longest edge of photo thumbnails in pixels (default: 320). 0 disables thumbnails.
    pub thumbnail_max_edge: u32,

    /// Preferred recorder mime for streams with video.
    pub video_mime_type: String,

    /// Preferred recorder mime for audio-only streams.
    pub audio_mime_type: String,

    /// Stream settings used when the caller has no preference.
    pub default_stream: StreamConfig,
}

impl StudioConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.archive_name.trim().is_empty() {
            return Err("archive name must not be empty".into());
        }
        if self
            .archive_name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\0'))
        {
            return Err(format!("invalid archive name: {}", self.archive_name));
        }
        if self.video_mime_type.is_empty() || self.audio_mime_type.is_empty() {
            return Err("recorder mime types must not be empty".into());
        }
        self.default_stream
            .validate(std::iter::empty::<&str>())
            .map_err(|e| format!("invalid default stream: {}", e))
    }
}

impl Default for StudioConfiguration {
    fn default() -> Self {
        Self {
            archive_name: "capturedMedia".into(),
            thumbnail_max_edge: 320,
            video_mime_type: "video/webm;codecs=vp9,opus".into(),
            audio_mime_type: "audio/webm;codecs=opus".into(),
            default_stream: StreamConfig::default(),
        }
    }
}
