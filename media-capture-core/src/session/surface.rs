use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

use crate::models::adjustment::{AdjustmentState, StyleFilter};
use crate::models::capture_result::CaptureResult;
use crate::models::config::{StreamConfig, StudioConfiguration};
use crate::models::device::CaptureDevice;
use crate::models::error::{AcquisitionError, CaptureError, StudioError};
use crate::models::media_record::MediaRecord;
use crate::models::state::{RecordingState, StreamState};
use crate::processing::filter_pipeline;
use crate::session::capture_engine::CaptureEngine;
use crate::session::device_registry::DeviceRegistry;
use crate::session::stream::{StreamInfo, StreamSession};
use crate::storage::archive::MediaArchive;
use crate::storage::export::ExportedArtifact;
use crate::traits::capture_host::CaptureHost;
use crate::traits::durable_store::DurableStore;
use crate::traits::surface_delegate::SurfaceDelegate;

/// One capture screen: devices, live stream, adjustments, capture and the
/// archive it feeds.
///
/// ```text
/// [DeviceRegistry] → StreamConfig → [StreamSession] ─→ preview_frame()
///                                         │
///                   [AdjustmentState] ──→ [CaptureEngine] → [MediaArchive]
/// ```
///
/// Every failing call returns its typed error and also leaves a user-facing
/// message in `last_error()` (forwarded to `SurfaceDelegate::on_error`).
/// Dropping the surface finalizes an in-flight recording and releases the
/// stream.
pub struct CaptureSurface<H: CaptureHost> {
    registry: Mutex<DeviceRegistry<H>>,
    stream: StreamSession<H>,
    adjustments: Mutex<AdjustmentState>,
    engine: CaptureEngine,
    archive: Arc<MediaArchive>,
    delegate: Option<Arc<dyn SurfaceDelegate>>,
    last_error: Mutex<Option<String>>,
    default_stream: StreamConfig,
}

impl<H: CaptureHost> CaptureSurface<H> {
    pub fn new(host: Arc<H>, archive: Arc<MediaArchive>, config: StudioConfiguration) -> Self {
        let default_stream = config.default_stream.clone();
        Self {
            registry: Mutex::new(DeviceRegistry::new(Arc::clone(&host))),
            stream: StreamSession::new(host),
            adjustments: Mutex::new(AdjustmentState::default()),
            engine: CaptureEngine::new(Arc::clone(&archive), config),
            archive,
            delegate: None,
            last_error: Mutex::new(None),
            default_stream,
        }
    }

    /// Build a surface whose archive lives in `store` under
    /// `config.archive_name`.
    pub fn open(host: Arc<H>, store: Arc<dyn DurableStore>, config: StudioConfiguration) -> Self {
        let archive = Arc::new(MediaArchive::open(config.archive_name.clone(), store));
        Self::new(host, archive, config)
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SurfaceDelegate>) {
        self.stream.set_delegate(Arc::clone(&delegate));
        self.engine.set_delegate(Arc::clone(&delegate));
        self.delegate = Some(delegate);
    }

    // -- Devices --

    pub fn list_devices(&self) -> Vec<CaptureDevice> {
        self.registry.lock().list_devices()
    }

    pub fn select_device(&self, id: impl Into<String>) {
        self.registry.lock().select_device(id);
    }

    pub fn selected_device(&self) -> Option<String> {
        self.registry.lock().selected_device().map(str::to_string)
    }

    // -- Stream --

    /// Start (or restart) the live stream.
    ///
    /// A config without a pinned device uses the registry selection. A
    /// running recording is finalized and the previous stream released
    /// first.
    pub fn start(&self, mut config: StreamConfig) -> Result<StreamInfo, StudioError> {
        self.finish_recording();
        if !config.is_preset() {
            log::debug!(
                "Custom stream settings {}@{}fps requested",
                config.resolution,
                config.frame_rate
            );
        }

        let known: Vec<String> = {
            let registry = self.registry.lock();
            if config.device_id.is_none() && config.mode.has_video() {
                config.device_id = registry.selected_device().map(str::to_string);
            }
            registry.device_ids().map(str::to_string).collect()
        };

        match self.stream.start(config, known.iter().map(String::as_str)) {
            Ok(info) => {
                *self.last_error.lock() = None;
                Ok(info)
            }
            Err(AcquisitionError::Aborted) => Err(AcquisitionError::Aborted.into()),
            Err(e) => Err(self.report(e.into())),
        }
    }

    /// Start with the configured default stream settings.
    pub fn start_default(&self) -> Result<StreamInfo, StudioError> {
        self.start(self.default_stream.clone())
    }

    /// Finalize any recording, then release the stream. Idempotent.
    pub fn stop(&self) {
        self.finish_recording();
        self.stream.stop();
    }

    pub fn stream_state(&self) -> StreamState {
        self.stream.state()
    }

    pub fn stream_info(&self) -> Option<StreamInfo> {
        self.stream.info()
    }

    // -- Capture --

    pub fn capture_photo(&self) -> Result<CaptureResult, StudioError> {
        let adjustment = *self.adjustments.lock();
        let result = self
            .engine
            .capture_photo(&self.stream, &adjustment)
            .map_err(|e| self.report(e.into()))?;
        self.warn_if_unpersisted(&result);
        Ok(result)
    }

    pub fn start_recording(&self) -> Result<(), StudioError> {
        self.engine
            .start_recording(&self.stream)
            .map_err(|e| self.report(e.into()))
    }

    pub fn stop_recording(&self) -> Result<CaptureResult, StudioError> {
        let result = self.engine.stop_recording().map_err(|e| self.report(e.into()))?;
        self.warn_if_unpersisted(&result);
        Ok(result)
    }

    pub fn recording_state(&self) -> RecordingState {
        self.engine.recording_state()
    }

    // -- Adjustments --

    /// Mutate the adjustments in one step and return the new value.
    pub fn adjust(&self, f: impl FnOnce(&mut AdjustmentState)) -> AdjustmentState {
        let mut adjustments = self.adjustments.lock();
        f(&mut adjustments);
        *adjustments
    }

    pub fn set_filter(&self, filter: StyleFilter) -> AdjustmentState {
        self.adjust(|a| a.set_filter(filter))
    }

    pub fn reset_adjustments(&self) -> AdjustmentState {
        self.adjust(AdjustmentState::reset)
    }

    pub fn adjustments(&self) -> AdjustmentState {
        *self.adjustments.lock()
    }

    /// The current live frame rendered through the adjustment chain.
    pub fn preview_frame(&self) -> Result<RgbaImage, StudioError> {
        let adjustment = self.adjustments();
        self.stream
            .with_stream(|s, _| {
                if !s.has_video() {
                    return Err(CaptureError::NoVideoTrack);
                }
                s.grab_frame()
            })
            .ok_or(CaptureError::NoActiveStream)
            .and_then(|frame| frame)
            .map(|frame| filter_pipeline::apply(&adjustment, &frame))
            .map_err(|e| self.report(e.into()))
    }

    /// CSS `filter` descriptor for a preview surface rendered by the host.
    pub fn preview_css(&self) -> String {
        self.adjustments.lock().css_filter()
    }

    // -- Archive --

    pub fn records(&self) -> Vec<MediaRecord> {
        self.archive.list()
    }

    /// Delete a record. Returns `Ok(false)` for an unknown id.
    pub fn remove_record(&self, id: &str) -> Result<bool, StudioError> {
        let removed = self.archive.remove(id).map_err(|e| self.report(e.into()))?;
        if removed {
            if let Some(ref delegate) = self.delegate {
                delegate.on_record_removed(id);
            }
        }
        Ok(removed)
    }

    pub fn export_record(&self, record: &MediaRecord) -> Result<ExportedArtifact, StudioError> {
        self.archive.export(record).map_err(|e| self.report(e.into()))
    }

    pub fn archive(&self) -> &Arc<MediaArchive> {
        &self.archive
    }

    /// User-facing message of the most recent failure.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    fn finish_recording(&self) {
        if !self.engine.is_recording() {
            return;
        }
        log::info!("Finalizing in-flight recording before releasing the stream");
        match self.engine.stop_recording() {
            Ok(result) => self.warn_if_unpersisted(&result),
            Err(CaptureError::NotRecording) => {}
            Err(e) => {
                self.report(e.into());
            }
        }
    }

    fn warn_if_unpersisted(&self, result: &CaptureResult) {
        if let Some(ref warning) = result.persistence_warning {
            self.report(warning.clone().into());
        }
    }

    fn report(&self, err: StudioError) -> StudioError {
        let message = err.user_message();
        log::warn!("{}", err);
        *self.last_error.lock() = Some(message.clone());
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&message);
        }
        err
    }
}

impl<H: CaptureHost> Drop for CaptureSurface<H> {
    fn drop(&mut self) {
        self.stop();
    }
}
