use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::adjustment::AdjustmentState;
use crate::models::capture_result::{sha256_hex, CaptureResult};
use crate::models::config::{CaptureMode, StudioConfiguration};
use crate::models::error::CaptureError;
use crate::models::media_record::{MediaPayload, MediaRecord, MediaType};
use crate::models::state::RecordingState;
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::processing::filter_pipeline;
use crate::processing::photo_encoding::{self, PHOTO_MIME_TYPE};
use crate::session::stream::StreamSession;
use crate::storage::archive::MediaArchive;
use crate::traits::capture_host::CaptureHost;
use crate::traits::media_encoder::{ChunkCallback, MediaEncoder};
use crate::traits::surface_delegate::SurfaceDelegate;

/// Encoder and buffered output of the recording in progress.
struct ActiveRecording {
    encoder: Box<dyn MediaEncoder>,
    chunks: Arc<Mutex<ChunkBuffer>>,
    started: Instant,
    media_type: MediaType,
}

struct EngineState {
    recording: RecordingState,
    active: Option<ActiveRecording>,
}

/// Turns the live stream into archived media.
///
/// Data flow:
/// ```text
/// photo:     [grab_frame] → [filter_pipeline] → [PNG + thumbnail] → [MediaArchive]
/// recording: [MediaEncoder] → chunks → [ChunkBuffer] → stop → [data URL] → [MediaArchive]
/// ```
/// The archive append (including the durable write) completes before any
/// capture call returns.
pub struct CaptureEngine {
    archive: Arc<MediaArchive>,
    config: StudioConfiguration,
    state: Mutex<EngineState>,
    delegate: Option<Arc<dyn SurfaceDelegate>>,
}

impl CaptureEngine {
    pub fn new(archive: Arc<MediaArchive>, config: StudioConfiguration) -> Self {
        Self {
            archive,
            config,
            state: Mutex::new(EngineState {
                recording: RecordingState::Idle,
                active: None,
            }),
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SurfaceDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Current recording state; `elapsed_secs` is measured live.
    pub fn recording_state(&self) -> RecordingState {
        let state = self.state.lock();
        match (&state.recording, &state.active) {
            (RecordingState::Recording { .. }, Some(active)) => RecordingState::Recording {
                elapsed_secs: active.started.elapsed().as_secs_f64(),
            },
            (other, _) => *other,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state.lock().recording.is_recording()
    }

    /// Capture the current frame with `adjustment` applied and archive it.
    ///
    /// The frame is rendered at the stream's native size. Nothing is created
    /// when the stream is not active or has no video track.
    pub fn capture_photo<H: CaptureHost>(
        &self,
        stream: &StreamSession<H>,
        adjustment: &AdjustmentState,
    ) -> Result<CaptureResult, CaptureError> {
        let frame = stream
            .with_stream(|s, _| {
                if !s.has_video() {
                    return Err(CaptureError::NoVideoTrack);
                }
                s.grab_frame()
            })
            .ok_or(CaptureError::NoActiveStream)??;

        let rendered = filter_pipeline::apply(adjustment, &frame);
        let png = photo_encoding::encode_png(&rendered)?;

        let mut record = MediaRecord::new(MediaType::Image, MediaPayload::encode(PHOTO_MIME_TYPE, &png));
        if let Some(thumb) = photo_encoding::thumbnail(&rendered, self.config.thumbnail_max_edge) {
            match photo_encoding::encode_png(&thumb) {
                Ok(bytes) => record = record.with_thumbnail(MediaPayload::encode(PHOTO_MIME_TYPE, &bytes)),
                Err(e) => log::warn!("Thumbnail skipped: {}", e),
            }
        }

        log::info!(
            "Photo captured: {}x{} ({} bytes, filter: {})",
            rendered.width(),
            rendered.height(),
            png.len(),
            adjustment.css_filter()
        );
        Ok(self.archive_record(record, &png))
    }

    /// Bind an encoder to the live stream and start buffering chunks.
    ///
    /// No-op when a recording is already in progress or finalizing.
    pub fn start_recording<H: CaptureHost>(&self, stream: &StreamSession<H>) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if !state.recording.is_idle() {
            log::debug!("start_recording ignored: already {}", state.recording.name());
            return Ok(());
        }

        let chunks = Arc::new(Mutex::new(ChunkBuffer::new()));
        let sink_chunks = Arc::clone(&chunks);
        let sink: ChunkCallback = Arc::new(move |chunk: &[u8]| {
            sink_chunks.lock().push(chunk);
        });

        let video_mime = self.config.video_mime_type.as_str();
        let audio_mime = self.config.audio_mime_type.as_str();
        let (encoder, media_type) = stream
            .with_stream(|s, config| -> Result<_, CaptureError> {
                let (preferred, media_type) = match config.mode {
                    CaptureMode::AudioOnly => (audio_mime, MediaType::Audio),
                    CaptureMode::VideoWithAudio | CaptureMode::VideoOnly => (video_mime, MediaType::Video),
                };
                let mut encoder = match s.create_encoder(Some(preferred)) {
                    Ok(encoder) => encoder,
                    Err(e) => {
                        log::warn!("{}; falling back to host default format", e);
                        s.create_encoder(None)?
                    }
                };
                encoder.start(sink)?;
                Ok((encoder, media_type))
            })
            .ok_or(CaptureError::NoActiveStream)??;

        log::info!("Recording {} as {}", media_type, encoder.mime_type());
        state.active = Some(ActiveRecording {
            encoder,
            chunks,
            started: Instant::now(),
            media_type,
        });
        state.recording = RecordingState::Recording { elapsed_secs: 0.0 };
        drop(state);

        self.notify(RecordingState::Recording { elapsed_secs: 0.0 });
        Ok(())
    }

    /// Stop the encoder, assemble the buffered chunks and archive the result.
    ///
    /// Transitions: recording → finalizing → idle. The state is back to idle
    /// on every exit path.
    pub fn stop_recording(&self) -> Result<CaptureResult, CaptureError> {
        let mut active = {
            let mut state = self.state.lock();
            let active = state.active.take().ok_or(CaptureError::NotRecording)?;
            state.recording = RecordingState::Finalizing;
            active
        };
        self.notify(RecordingState::Finalizing);

        let result = self.finalize(&mut active);

        self.state.lock().recording = RecordingState::Idle;
        self.notify(RecordingState::Idle);
        result
    }

    fn finalize(&self, active: &mut ActiveRecording) -> Result<CaptureResult, CaptureError> {
        if let Err(e) = active.encoder.stop() {
            // Keep whatever was flushed before the failure.
            log::error!("Encoder stop failed: {}", e);
        }
        let duration = active.started.elapsed().as_secs_f64();

        let (chunk_count, bytes) = {
            let mut chunks = active.chunks.lock();
            (chunks.len(), chunks.take_concatenated())
        };
        if bytes.is_empty() {
            return Err(CaptureError::EncodingFailed("recorder produced no data".into()));
        }

        let payload = MediaPayload::encode(active.encoder.mime_type(), &bytes);
        let record = MediaRecord::new(active.media_type, payload).with_duration(duration);
        log::info!(
            "Recording finalized: {} chunks, {} bytes, {:.2}s",
            chunk_count,
            bytes.len(),
            duration
        );
        Ok(self.archive_record(record, &bytes))
    }

    fn archive_record(&self, record: MediaRecord, artifact: &[u8]) -> CaptureResult {
        let persistence_warning = self.archive.append(record.clone()).err();
        if let Some(ref delegate) = self.delegate {
            delegate.on_record_archived(&record);
        }
        CaptureResult {
            record,
            checksum: sha256_hex(artifact),
            persistence_warning,
        }
    }

    fn notify(&self, state: RecordingState) {
        log::debug!("Recording state → {}", state.name());
        if let Some(ref delegate) = self.delegate {
            delegate.on_recording_state_changed(&state);
        }
    }
}
