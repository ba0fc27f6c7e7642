use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::StreamConfig;
use crate::models::device::TrackInfo;
use crate::models::error::AcquisitionError;
use crate::models::state::StreamState;
use crate::traits::capture_host::CaptureHost;
use crate::traits::media_stream::MediaStream;
use crate::traits::surface_delegate::SurfaceDelegate;

/// Description of a freshly acquired stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub config: StreamConfig,
    /// Native video size, `None` for audio-only streams.
    pub video_size: Option<(u32, u32)>,
    pub tracks: Vec<TrackInfo>,
}

struct StreamInner {
    state: StreamState,
    stream: Option<Box<dyn MediaStream>>,
    config: Option<StreamConfig>,
    /// Bumped by every `start()`; lets a resolving acquisition notice it was
    /// superseded.
    attempt: u64,
}

impl StreamInner {
    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            log::debug!("Releasing {} track(s)", stream.tracks().len());
            stream.stop();
        }
        self.config = None;
    }
}

/// Owns the live stream for one capture surface.
///
/// At most one stream is live at a time: starting again releases the
/// previous tracks first. Tracks are released on `stop()` and on drop.
///
/// Methods take `&self`, so `stop()` may be called from another thread
/// while `start()` is blocked on a permission prompt.
pub struct StreamSession<H: CaptureHost> {
    host: Arc<H>,
    inner: Mutex<StreamInner>,
    delegate: Option<Arc<dyn SurfaceDelegate>>,
}

impl<H: CaptureHost> StreamSession<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            inner: Mutex::new(StreamInner {
                state: StreamState::Idle,
                stream: None,
                config: None,
                attempt: 0,
            }),
            delegate: None,
        }
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SurfaceDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> StreamState {
        self.inner.lock().state.clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().state.is_active()
    }

    /// Config of the active stream.
    pub fn config(&self) -> Option<StreamConfig> {
        self.inner.lock().config.clone()
    }

    /// Acquire a stream for `config`. Transitions: idle → requesting → active | error.
    ///
    /// `known_devices` are the ids of the latest enumeration; a pinned device
    /// outside that set fails with `DeviceUnavailable` before the host is
    /// asked. An active stream is released before anything else happens.
    pub fn start<'a>(
        &self,
        config: StreamConfig,
        known_devices: impl IntoIterator<Item = &'a str>,
    ) -> Result<StreamInfo, AcquisitionError> {
        let attempt = {
            let mut inner = self.inner.lock();
            inner.release();
            inner.attempt += 1;

            if let Err(e) = config.validate(known_devices) {
                log::warn!("Rejected stream config: {}", e);
                inner.state = StreamState::Error(e.clone());
                drop(inner);
                self.notify(StreamState::Error(e.clone()));
                return Err(e);
            }

            inner.state = StreamState::Requesting;
            inner.attempt
        };
        self.notify(StreamState::Requesting);

        log::debug!(
            "Requesting {:?} stream at {} @ {}fps (device: {})",
            config.mode,
            config.resolution,
            config.frame_rate,
            config.device_id.as_deref().unwrap_or("any")
        );
        let result = self.host.acquire(&config.constraints());

        let mut inner = self.inner.lock();
        if inner.attempt != attempt {
            // A newer start() owns the session now.
            drop(inner);
            if let Ok(mut stream) = result {
                stream.stop();
            }
            log::debug!("Stream acquisition superseded");
            return Err(AcquisitionError::Aborted);
        }

        match result {
            Err(e) => {
                // Failure wins over a pending stop: the user must see why.
                log::warn!("Stream acquisition failed: {}", e);
                inner.state = StreamState::Error(e.clone());
                drop(inner);
                self.notify(StreamState::Error(e.clone()));
                Err(e)
            }
            Ok(mut stream) => {
                if !matches!(inner.state, StreamState::Requesting) {
                    drop(inner);
                    stream.stop();
                    log::info!("Stream acquired after stop(); released immediately");
                    return Err(AcquisitionError::Aborted);
                }

                let info = StreamInfo {
                    config: config.clone(),
                    video_size: stream.video_size(),
                    tracks: stream.tracks(),
                };
                log::info!(
                    "Stream active: {} track(s), video {:?}",
                    info.tracks.len(),
                    info.video_size
                );
                inner.stream = Some(stream);
                inner.config = Some(config);
                inner.state = StreamState::Active;
                drop(inner);
                self.notify(StreamState::Active);
                Ok(info)
            }
        }
    }

    /// Release every track and return to idle. No-op when already idle.
    ///
    /// During `Requesting` this cancels the pending acquisition: its tracks
    /// are released as soon as the host delivers them.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.release();
        if inner.state.is_idle() {
            return;
        }
        inner.state = StreamState::Idle;
        drop(inner);
        log::debug!("Stream stopped");
        self.notify(StreamState::Idle);
    }

    /// Run `f` against the live stream. Returns `None` unless active.
    pub fn with_stream<R>(&self, f: impl FnOnce(&mut dyn MediaStream, &StreamConfig) -> R) -> Option<R> {
        let mut inner = self.inner.lock();
        if !inner.state.is_active() {
            return None;
        }
        let StreamInner { stream, config, .. } = &mut *inner;
        match (stream.as_mut(), config.as_ref()) {
            (Some(stream), Some(config)) => Some(f(&mut **stream, config)),
            _ => None,
        }
    }

    /// Snapshot of the active stream.
    pub fn info(&self) -> Option<StreamInfo> {
        self.with_stream(|stream, config| StreamInfo {
            config: config.clone(),
            video_size: stream.video_size(),
            tracks: stream.tracks(),
        })
    }

    fn notify(&self, state: StreamState) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_stream_state_changed(&state);
        }
    }
}

impl<H: CaptureHost> Drop for StreamSession<H> {
    fn drop(&mut self) {
        self.inner.lock().release();
    }
}
