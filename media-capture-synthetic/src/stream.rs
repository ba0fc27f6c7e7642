//! Synthetic live stream.
//!
//! Renders an animated test pattern: a diagonal color gradient with a white
//! bar that moves one step per grabbed frame.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};

use media_capture_core::models::device::{TrackInfo, TrackKind};
use media_capture_core::models::error::CaptureError;
use media_capture_core::traits::media_encoder::MediaEncoder;
use media_capture_core::traits::media_stream::MediaStream;

use crate::host::{HostStats, SyntheticCamera};
use crate::recorder::SyntheticRecorder;

/// Recorder format used when the caller has no preference.
pub const DEFAULT_RECORDER_MIME: &str = "video/webm;codecs=vp8,opus";
const DEFAULT_AUDIO_RECORDER_MIME: &str = "audio/webm;codecs=opus";

const BAR_WIDTH: u32 = 8;

pub struct SyntheticStream {
    video: Option<(SyntheticCamera, (u32, u32))>,
    audio: bool,
    stats: Arc<HostStats>,
    chunk_interval: Duration,
    frame_index: u32,
    stopped: bool,
}

impl SyntheticStream {
    pub(crate) fn new(
        video: Option<(SyntheticCamera, (u32, u32))>,
        audio: bool,
        stats: Arc<HostStats>,
        chunk_interval: Duration,
    ) -> Self {
        let track_count = video.is_some() as usize + audio as usize;
        stats.live_tracks.fetch_add(track_count, Ordering::SeqCst);
        Self {
            video,
            audio,
            stats,
            chunk_interval,
            frame_index: 0,
            stopped: false,
        }
    }

    fn render(&self, width: u32, height: u32) -> RgbaImage {
        let bar_x = (self.frame_index * BAR_WIDTH) % width.max(1);
        RgbaImage::from_fn(width, height, |x, y| {
            if x >= bar_x && x < bar_x + BAR_WIDTH {
                return Rgba([255, 255, 255, 255]);
            }
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 255 / (width + height).max(1)) as u8;
            Rgba([r, g, 255 - b, 255])
        })
    }
}

impl MediaStream for SyntheticStream {
    fn tracks(&self) -> Vec<TrackInfo> {
        if self.stopped {
            return Vec::new();
        }
        let mut tracks = Vec::new();
        if let Some((ref camera, _)) = self.video {
            tracks.push(TrackInfo {
                id: format!("{}-video", camera.id),
                kind: TrackKind::Video,
                label: camera.label.clone(),
            });
        }
        if self.audio {
            tracks.push(TrackInfo {
                id: "synthetic-mic-audio".into(),
                kind: TrackKind::Audio,
                label: "Synthetic Microphone".into(),
            });
        }
        tracks
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.video.as_ref().map(|(_, size)| *size)
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        if self.stopped {
            return Err(CaptureError::FrameUnavailable("stream stopped".into()));
        }
        let (width, height) = self
            .video_size()
            .ok_or_else(|| CaptureError::FrameUnavailable("no video track".into()))?;
        let frame = self.render(width, height);
        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(frame)
    }

    fn create_encoder(&mut self, mime_type: Option<&str>) -> Result<Box<dyn MediaEncoder>, CaptureError> {
        if self.stopped {
            return Err(CaptureError::EncoderFailed("stream stopped".into()));
        }
        let mime = match mime_type {
            Some(requested) if self.stats.reject_preferred_mime.load(Ordering::SeqCst) => {
                return Err(CaptureError::EncoderFailed(format!(
                    "{} is not supported by this recorder",
                    requested
                )));
            }
            Some(requested) => requested.to_string(),
            None if self.video.is_some() => DEFAULT_RECORDER_MIME.to_string(),
            None => DEFAULT_AUDIO_RECORDER_MIME.to_string(),
        };
        self.stats.encoders_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticRecorder::new(mime, self.chunk_interval)))
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        let track_count = self.video.is_some() as usize + self.audio as usize;
        self.stats.live_tracks.fetch_sub(track_count, Ordering::SeqCst);
        log::debug!("Synthetic stream stopped ({} track(s))", track_count);
    }
}

impl Drop for SyntheticStream {
    fn drop(&mut self) {
        self.stop();
    }
}
