//! Synthetic capture host.
//!
//! Enumerates a configurable set of test-pattern cameras plus one microphone
//! and one speaker, and hands out `SyntheticStream`s. Failure modes are
//! switched at runtime through `HostBehavior`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use media_capture_core::models::config::MediaConstraints;
use media_capture_core::models::device::{DeviceDescriptor, DeviceKind};
use media_capture_core::models::error::AcquisitionError;
use media_capture_core::traits::capture_host::CaptureHost;
use media_capture_core::traits::media_stream::MediaStream;

use crate::stream::SyntheticStream;

/// Default interval between recorder chunks.
const DEFAULT_CHUNK_INTERVAL: Duration = Duration::from_millis(20);

/// How the host answers enumeration and acquisition requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostBehavior {
    #[default]
    Grant,
    /// The user dismissed the permission prompt.
    DenyPermission,
    /// Every camera is unplugged.
    NoDevice,
    /// The driver refuses the requested mode.
    Unsatisfiable,
    /// Enumeration is blocked (acquisition still works).
    FailEnumeration,
}

/// A fake camera with a native sensor size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticCamera {
    pub id: String,
    pub label: String,
    pub native_size: (u32, u32),
}

impl SyntheticCamera {
    pub fn new(id: impl Into<String>, label: impl Into<String>, native_size: (u32, u32)) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            native_size,
        }
    }
}

/// Resource counters shared by the host and everything it hands out.
#[derive(Debug, Default)]
pub struct HostStats {
    pub(crate) live_tracks: AtomicUsize,
    pub(crate) streams_acquired: AtomicUsize,
    pub(crate) encoders_created: AtomicUsize,
    pub(crate) reject_preferred_mime: AtomicBool,
}

impl HostStats {
    /// Tracks currently held by unstopped streams (the "camera light").
    pub fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    pub fn streams_acquired(&self) -> usize {
        self.streams_acquired.load(Ordering::SeqCst)
    }

    pub fn encoders_created(&self) -> usize {
        self.encoders_created.load(Ordering::SeqCst)
    }
}

/// Holds one `acquire()` call until released, simulating a permission
/// prompt the user has not answered yet.
pub struct AcquireGate {
    requested: mpsc::Receiver<()>,
    release: mpsc::Sender<()>,
}

impl AcquireGate {
    /// Block until the held `acquire()` has been entered.
    pub fn wait_until_requested(&self) {
        let _ = self.requested.recv();
    }

    /// Let the held `acquire()` answer.
    pub fn release(self) {
        let _ = self.release.send(());
    }
}

struct PendingGate {
    requested: mpsc::Sender<()>,
    release: mpsc::Receiver<()>,
}

pub struct SyntheticHost {
    cameras: Vec<SyntheticCamera>,
    behavior: Mutex<HostBehavior>,
    gate: Mutex<Option<PendingGate>>,
    stats: Arc<HostStats>,
    chunk_interval: Duration,
}

impl SyntheticHost {
    /// Two cameras (front 1280x720, back 1920x1080) and a microphone.
    pub fn new() -> Self {
        Self::with_cameras(vec![
            SyntheticCamera::new("synthetic-front", "Synthetic Front Camera", (1280, 720)),
            SyntheticCamera::new("synthetic-back", "Synthetic Back Camera", (1920, 1080)),
        ])
    }

    pub fn with_cameras(cameras: Vec<SyntheticCamera>) -> Self {
        Self {
            cameras,
            behavior: Mutex::new(HostBehavior::Grant),
            gate: Mutex::new(None),
            stats: Arc::new(HostStats::default()),
            chunk_interval: DEFAULT_CHUNK_INTERVAL,
        }
    }

    pub fn with_chunk_interval(mut self, interval: Duration) -> Self {
        self.chunk_interval = interval;
        self
    }

    pub fn set_behavior(&self, behavior: HostBehavior) {
        log::debug!("Synthetic host behavior → {:?}", behavior);
        *self.behavior.lock() = behavior;
    }

    pub fn behavior(&self) -> HostBehavior {
        *self.behavior.lock()
    }

    /// Make streams refuse every explicitly requested recorder format.
    pub fn set_reject_preferred_mime(&self, reject: bool) {
        self.stats.reject_preferred_mime.store(reject, Ordering::SeqCst);
    }

    /// Hold the next `acquire()` until the returned gate is released.
    pub fn hold_next_acquire(&self) -> AcquireGate {
        let (requested_tx, requested_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock() = Some(PendingGate {
            requested: requested_tx,
            release: release_rx,
        });
        AcquireGate {
            requested: requested_rx,
            release: release_tx,
        }
    }

    pub fn stats(&self) -> &HostStats {
        &self.stats
    }

    pub fn cameras(&self) -> &[SyntheticCamera] {
        &self.cameras
    }

    fn wait_for_gate(&self) {
        let pending = self.gate.lock().take();
        if let Some(gate) = pending {
            let _ = gate.requested.send(());
            let _ = gate.release.recv();
        }
    }

    fn pick_camera(&self, exact_id: Option<&str>) -> Result<&SyntheticCamera, AcquisitionError> {
        match exact_id {
            Some(id) => self
                .cameras
                .iter()
                .find(|c| c.id == id)
                .ok_or_else(|| AcquisitionError::DeviceUnavailable(id.to_string())),
            None => self
                .cameras
                .first()
                .ok_or_else(|| AcquisitionError::DeviceUnavailable("no video input connected".into())),
        }
    }
}

impl Default for SyntheticHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureHost for SyntheticHost {
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, AcquisitionError> {
        match self.behavior() {
            HostBehavior::FailEnumeration => return Err(AcquisitionError::PermissionDenied),
            HostBehavior::NoDevice => {
                return Ok(vec![DeviceDescriptor::new(
                    "synthetic-speaker",
                    "Synthetic Speaker",
                    DeviceKind::AudioOutput,
                )])
            }
            _ => {}
        }

        let mut devices: Vec<_> = self
            .cameras
            .iter()
            .map(|c| DeviceDescriptor::new(c.id.clone(), c.label.clone(), DeviceKind::VideoInput))
            .collect();
        devices.push(DeviceDescriptor::new(
            "synthetic-mic",
            "Synthetic Microphone",
            DeviceKind::AudioInput,
        ));
        devices.push(DeviceDescriptor::new(
            "synthetic-speaker",
            "Synthetic Speaker",
            DeviceKind::AudioOutput,
        ));
        Ok(devices)
    }

    fn acquire(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>, AcquisitionError> {
        self.wait_for_gate();

        match self.behavior() {
            HostBehavior::DenyPermission => return Err(AcquisitionError::PermissionDenied),
            HostBehavior::NoDevice => {
                return Err(AcquisitionError::DeviceUnavailable("no input devices connected".into()))
            }
            HostBehavior::Unsatisfiable => {
                return Err(AcquisitionError::ConstraintsUnsatisfiable(
                    "synthetic driver refused the requested mode".into(),
                ))
            }
            HostBehavior::Grant | HostBehavior::FailEnumeration => {}
        }

        let video = match constraints.video {
            Some(ref v) => {
                let camera = self.pick_camera(v.exact_device_id.as_deref())?;
                let (native_w, native_h) = camera.native_size;
                // "ideal" constraints: never upscale past the sensor
                let size = (v.ideal_width.min(native_w), v.ideal_height.min(native_h));
                Some((camera.clone(), size))
            }
            None => None,
        };
        if video.is_none() && !constraints.audio {
            return Err(AcquisitionError::ConstraintsUnsatisfiable(
                "neither video nor audio requested".into(),
            ));
        }

        let stream = SyntheticStream::new(video, constraints.audio, Arc::clone(&self.stats), self.chunk_interval);
        self.stats.streams_acquired.fetch_add(1, Ordering::SeqCst);
        log::info!(
            "Synthetic stream acquired ({} live track(s) total)",
            self.stats.live_tracks()
        );
        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_capture_core::models::config::{CaptureMode, Resolution, StreamConfig};

    fn constraints(mode: CaptureMode) -> MediaConstraints {
        StreamConfig::new(Resolution::FULL_HD, 30, mode).constraints()
    }

    #[test]
    fn enumerates_cameras_and_audio_devices() {
        let host = SyntheticHost::new();
        let devices = host.enumerate_devices().unwrap();
        let video: Vec<_> = devices.iter().filter(|d| d.kind == DeviceKind::VideoInput).collect();
        assert_eq!(video.len(), 2);
        assert_eq!(devices.len(), 4);
    }

    #[test]
    fn stream_size_is_clamped_to_sensor() {
        let host = SyntheticHost::new();
        let stream = host.acquire(&constraints(CaptureMode::VideoOnly)).unwrap();
        // first camera is 1280x720
        assert_eq!(stream.video_size(), Some((1280, 720)));
        assert_eq!(host.stats().live_tracks(), 1);
    }

    #[test]
    fn pinned_unknown_camera_is_unavailable() {
        let host = SyntheticHost::new();
        let mut c = constraints(CaptureMode::VideoOnly);
        if let Some(ref mut v) = c.video {
            v.exact_device_id = Some("usb-9".into());
        }
        assert_eq!(
            host.acquire(&c).err(),
            Some(AcquisitionError::DeviceUnavailable("usb-9".into()))
        );
        assert_eq!(host.stats().live_tracks(), 0);
    }

    #[test]
    fn behaviors_map_to_acquisition_errors() {
        let host = SyntheticHost::new();
        host.set_behavior(HostBehavior::DenyPermission);
        assert_eq!(
            host.acquire(&constraints(CaptureMode::VideoWithAudio)).err(),
            Some(AcquisitionError::PermissionDenied)
        );

        host.set_behavior(HostBehavior::FailEnumeration);
        assert!(host.enumerate_devices().is_err());
        assert!(host.acquire(&constraints(CaptureMode::AudioOnly)).is_ok());
    }

    #[test]
    fn no_device_lists_no_inputs() {
        let host = SyntheticHost::new();
        host.set_behavior(HostBehavior::NoDevice);
        let devices = host.enumerate_devices().unwrap();
        assert!(devices.iter().all(|d| d.kind == DeviceKind::AudioOutput));
        assert!(matches!(
            host.acquire(&constraints(CaptureMode::VideoOnly)).err(),
            Some(AcquisitionError::DeviceUnavailable(_))
        ));
    }
}
