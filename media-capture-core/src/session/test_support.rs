//! In-crate fakes of the host traits shared by the session tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::models::config::MediaConstraints;
use crate::models::device::{DeviceDescriptor, DeviceKind, TrackInfo, TrackKind};
use crate::models::error::{AcquisitionError, CaptureError};
use crate::models::media_record::MediaRecord;
use crate::models::state::{RecordingState, StreamState};
use crate::traits::capture_host::CaptureHost;
use crate::traits::media_encoder::{ChunkCallback, MediaEncoder};
use crate::traits::media_stream::MediaStream;
use crate::traits::surface_delegate::SurfaceDelegate;

pub(crate) const HOST_DEFAULT_MIME: &str = "video/x-matroska;codecs=avc1";

#[derive(Default)]
pub(crate) struct Counters {
    pub live_streams: AtomicUsize,
    pub encoders: AtomicUsize,
    pub reject_preferred: AtomicBool,
}

pub(crate) struct TestHost {
    pub counters: Arc<Counters>,
    pub deny: AtomicBool,
    pub devices: Mutex<Vec<DeviceDescriptor>>,
}

impl TestHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            counters: Arc::new(Counters::default()),
            deny: AtomicBool::new(false),
            devices: Mutex::new(vec![
                DeviceDescriptor::new("cam-front", "Front", DeviceKind::VideoInput),
                DeviceDescriptor::new("mic-0", "Mic", DeviceKind::AudioInput),
                DeviceDescriptor::new("cam-back", "Back", DeviceKind::VideoInput),
            ]),
        })
    }

    pub fn live_streams(&self) -> usize {
        self.counters.live_streams.load(Ordering::SeqCst)
    }

    pub fn encoders(&self) -> usize {
        self.counters.encoders.load(Ordering::SeqCst)
    }
}

impl CaptureHost for TestHost {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, AcquisitionError> {
        Ok(self.devices.lock().clone())
    }

    fn acquire(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>, AcquisitionError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(AcquisitionError::PermissionDenied);
        }
        self.counters.live_streams.fetch_add(1, Ordering::SeqCst);
        let size = constraints
            .video
            .as_ref()
            .map(|v| (v.ideal_width.min(64), v.ideal_height.min(36)));
        Ok(Box::new(TestStream {
            counters: Arc::clone(&self.counters),
            size,
            audio: constraints.audio,
            stopped: false,
        }))
    }
}

pub(crate) struct TestStream {
    counters: Arc<Counters>,
    size: Option<(u32, u32)>,
    audio: bool,
    stopped: bool,
}

impl MediaStream for TestStream {
    fn tracks(&self) -> Vec<TrackInfo> {
        let mut tracks = Vec::new();
        if self.size.is_some() {
            tracks.push(TrackInfo {
                id: "video-0".into(),
                kind: TrackKind::Video,
                label: "test pattern".into(),
            });
        }
        if self.audio {
            tracks.push(TrackInfo {
                id: "audio-0".into(),
                kind: TrackKind::Audio,
                label: "silence".into(),
            });
        }
        tracks
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.size
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        let (w, h) = self
            .size
            .ok_or_else(|| CaptureError::FrameUnavailable("no video track".into()))?;
        Ok(RgbaImage::from_pixel(w, h, Rgba([200, 100, 50, 255])))
    }

    fn create_encoder(&mut self, mime_type: Option<&str>) -> Result<Box<dyn MediaEncoder>, CaptureError> {
        let mime = match mime_type {
            Some(m) if self.counters.reject_preferred.load(Ordering::SeqCst) => {
                return Err(CaptureError::EncoderFailed(format!("{} not supported", m)));
            }
            Some(m) => m.to_string(),
            None => HOST_DEFAULT_MIME.to_string(),
        };
        self.counters.encoders.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestEncoder { mime, sink: None }))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.counters.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for TestStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Emits `head` on start, an empty chunk and `tail` on stop.
pub(crate) struct TestEncoder {
    mime: String,
    sink: Option<ChunkCallback>,
}

impl MediaEncoder for TestEncoder {
    fn mime_type(&self) -> &str {
        &self.mime
    }

    fn start(&mut self, sink: ChunkCallback) -> Result<(), CaptureError> {
        sink(b"head");
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(sink) = self.sink.take() {
            sink(b"");
            sink(b"tail");
        }
        Ok(())
    }
}

/// Records every delegate callback as a short string.
#[derive(Default)]
pub(crate) struct EventLog {
    pub events: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl SurfaceDelegate for EventLog {
    fn on_stream_state_changed(&self, state: &StreamState) {
        self.events.lock().push(format!("stream:{}", state.name()));
    }

    fn on_recording_state_changed(&self, state: &RecordingState) {
        self.events.lock().push(format!("recording:{}", state.name()));
    }

    fn on_error(&self, message: &str) {
        self.events.lock().push(format!("error:{}", message));
    }

    fn on_record_archived(&self, record: &MediaRecord) {
        self.events.lock().push(format!("archived:{}", record.media_type));
    }

    fn on_record_removed(&self, id: &str) {
        self.events.lock().push(format!("removed:{}", id));
    }
}
