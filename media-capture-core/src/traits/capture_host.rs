use crate::models::config::MediaConstraints;
use crate::models::device::DeviceDescriptor;
use crate::models::error::AcquisitionError;
use crate::traits::media_stream::MediaStream;

/// Interface to the platform's camera and microphone APIs.
///
/// Implemented by:
/// - `SyntheticHost` (software test pattern, `media-capture-synthetic`)
/// - platform backends (V4L2, AVFoundation, browser media devices)
pub trait CaptureHost: Send + Sync {
    /// Every input/output device the host is willing to report.
    ///
    /// May fail when the host denies enumeration; callers degrade to an
    /// empty device list.
    fn enumerate_devices(&self) -> Result<Vec<DeviceDescriptor>, AcquisitionError>;

    /// Request hardware access for `constraints`.
    ///
    /// Blocks until the user/OS answers the permission prompt. No timeout is
    /// applied.
    fn acquire(&self, constraints: &MediaConstraints) -> Result<Box<dyn MediaStream>, AcquisitionError>;
}
